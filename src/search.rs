use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::Board;
use crate::evaluation::{self, Score, CHECKMATE, DRAW_SCORE, INFINITY, PIECE_TYPE_VALUE};
use crate::move_generator::{generate, GenType};
use crate::movelist::MoveList;
use crate::piece::{Color, PieceType};
use crate::r#move::Move;
use crate::transposition_table::{
    pack_move, score_from_tt, score_to_tt, Bound, TranspositionTable,
};

pub const MAX_PLY: usize = 128;
const MAX_DEPTH: i32 = 64;

const ASPIRATION_WINDOW: Score = 30;
const ASPIRATION_WINDOW_MAX: Score = 500;
const RAZOR_MARGIN: [Score; 3] = [0, 200, 500];
const FUTILITY_MARGIN: [Score; 4] = [0, 150, 300, 500];
const DELTA_MARGIN: Score = 50;

/// Everything the `go` command can ask for. Zero means "not given" for the
/// numeric fields.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub wtime_ms: u64,
    pub btime_ms: u64,
    pub winc_ms: u64,
    pub binc_ms: u64,
    pub movetime_ms: u64,
    pub nodes: u64,
    pub movestogo: u32,
    pub depth: i32,
    pub infinite: bool,
}

/// The outcome of the last completed iteration.
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub best_move: Move,
    pub score: Score,
    pub depth: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// Search state that outlives a single `go`: the transposition table, the
/// quiet-move history rewards and the killer slots.
struct Tables {
    tt: TranspositionTable,
    history: [[[Score; 64]; 64]; 2],
    killers: [[Move; 2]; MAX_PLY],
}

impl Tables {
    fn new(hash_mb: usize) -> Tables {
        Tables {
            tt: TranspositionTable::new(hash_mb),
            history: [[[0; 64]; 64]; 2],
            killers: [[Move::NULL_MOVE; 2]; MAX_PLY],
        }
    }

    fn clear(&mut self) {
        self.tt.clear();
        self.history = [[[0; 64]; 64]; 2];
        self.killers = [[Move::NULL_MOVE; 2]; MAX_PLY];
    }
}

/// Owns the single search worker. `start` hands the worker a clone of the
/// position together with the tables; joining the worker gets the tables
/// back, so they persist from one search to the next.
pub struct Search {
    stop: Arc<AtomicBool>,
    nodes: Arc<AtomicU64>,
    worker: Option<JoinHandle<(Tables, SearchReport)>>,
    tables: Option<Tables>,
    hash_mb: usize,
}

impl Search {
    pub fn new() -> Search {
        Search {
            stop: Arc::new(AtomicBool::new(false)),
            nodes: Arc::new(AtomicU64::new(0)),
            worker: None,
            tables: Some(Tables::new(64)),
            hash_mb: 64,
        }
    }

    pub fn set_hash_mb(&mut self, megabytes: usize) {
        self.join_worker();
        self.hash_mb = megabytes;
        if let Some(tables) = self.tables.as_mut() {
            tables.tt.resize_mb(megabytes);
        }
    }

    /// Forgets everything learned so far (TT, history, killers, node count)
    pub fn clear(&mut self) {
        self.join_worker();
        if let Some(tables) = self.tables.as_mut() {
            tables.clear();
        }
        self.nodes.store(0, Ordering::Release);
    }

    pub fn start(&mut self, board: &Board, limits: SearchLimits) {
        self.join_worker();
        self.stop.store(false, Ordering::Release);
        self.nodes.store(0, Ordering::Release);

        let mut worker = Worker {
            board: board.clone(),
            tables: self
                .tables
                .take()
                .unwrap_or_else(|| Tables::new(self.hash_mb)),
            limits,
            stop: Arc::clone(&self.stop),
            nodes: Arc::clone(&self.nodes),
            start_time: Instant::now(),
            budget: None,
        };
        self.worker = Some(std::thread::spawn(move || {
            let report = worker.think();
            (worker.tables, report)
        }));
    }

    /// Requests a stop and waits for the worker to finish
    pub fn stop(&mut self) -> Option<SearchReport> {
        self.stop.store(true, Ordering::Release);
        self.join_worker()
    }

    /// Waits for the worker to finish on its own (depth- or time-limited
    /// searches)
    pub fn wait(&mut self) -> Option<SearchReport> {
        self.join_worker()
    }

    pub fn node_count(&self) -> u64 {
        self.nodes.load(Ordering::Acquire)
    }

    fn join_worker(&mut self) -> Option<SearchReport> {
        let handle = self.worker.take()?;
        match handle.join() {
            Ok((tables, report)) => {
                self.tables = Some(tables);
                Some(report)
            }
            Err(_) => {
                debug!("search worker panicked, rebuilding tables");
                self.tables = Some(Tables::new(self.hash_mb));
                None
            }
        }
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Search {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.join_worker();
    }
}

struct Worker {
    board: Board,
    tables: Tables,
    limits: SearchLimits,
    stop: Arc<AtomicBool>,
    nodes: Arc<AtomicU64>,
    start_time: Instant,
    budget: Option<Duration>,
}

impl Worker {
    fn think(&mut self) -> SearchReport {
        self.start_time = Instant::now();
        self.budget = self.compute_budget();

        let mut report = self.iterative_deepening();

        if report.best_move.is_null() {
            // no completed iteration; fall back to any legal move
            let legal_moves = generate(&mut self.board, GenType::Legal);
            report.best_move = legal_moves.get(0).unwrap_or(Move::NULL_MOVE);
        }
        println!("bestmove {}", report.best_move);
        report
    }

    fn compute_budget(&self) -> Option<Duration> {
        if self.limits.infinite {
            return None;
        }
        if self.limits.movetime_ms > 0 {
            return Some(Duration::from_millis(self.limits.movetime_ms));
        }
        let (clock, increment) = match self.board.side_to_move() {
            Color::White => (self.limits.wtime_ms, self.limits.winc_ms),
            Color::Black => (self.limits.btime_ms, self.limits.binc_ms),
        };
        if clock > 0 {
            let movestogo = if self.limits.movestogo > 0 {
                u64::from(self.limits.movestogo)
            } else {
                30
            };
            let budget = (clock / movestogo + increment / 2).max(10);
            Some(Duration::from_millis(budget.min(clock.saturating_sub(50))))
        } else {
            Some(Duration::from_millis(1000))
        }
    }

    fn time_up(&self) -> bool {
        if let Some(budget) = self.budget {
            if self.start_time.elapsed() >= budget {
                return true;
            }
        }
        self.limits.nodes > 0 && self.nodes.load(Ordering::Relaxed) > self.limits.nodes
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire) || self.time_up()
    }

    fn iterative_deepening(&mut self) -> SearchReport {
        let mut report = SearchReport::default();
        let max_depth = if self.limits.depth > 0 {
            self.limits.depth.min(MAX_DEPTH)
        } else {
            MAX_DEPTH
        };

        let mut window = ASPIRATION_WINDOW;
        let mut previous_score: Option<Score> = None;

        for depth in 1..=max_depth {
            let (mut alpha, mut beta) = match previous_score {
                Some(score) if depth >= 4 => (score - window, score + window),
                _ => (-INFINITY, INFINITY),
            };

            let mut pv = Vec::with_capacity(depth as usize);
            let mut score = self.negamax(depth, alpha, beta, 0, &mut pv, true);
            if score <= alpha || score >= beta {
                alpha = -INFINITY;
                beta = INFINITY;
                pv.clear();
                score = self.negamax(depth, alpha, beta, 0, &mut pv, true);
                window = (window * 2).min(ASPIRATION_WINDOW_MAX);
            }

            // a stopped iteration unwound with garbage; keep the previous one
            if self.should_stop() && depth > 1 {
                break;
            }

            previous_score = Some(score);
            if let Some(first) = pv.first() {
                report.best_move = *first;
            }
            report.score = score;
            report.depth = depth;
            report.nodes = self.nodes.load(Ordering::Relaxed);
            report.pv = pv.clone();

            let pv_string = pv
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "info depth {} score cp {} time {} nodes {} pv {}",
                depth,
                score,
                self.start_time.elapsed().as_millis(),
                report.nodes,
                pv_string
            );

            if self.should_stop() {
                break;
            }
        }
        report
    }

    fn negamax(
        &mut self,
        depth: i32,
        mut alpha: Score,
        mut beta: Score,
        ply: i32,
        pv: &mut Vec<Move>,
        allow_null: bool,
    ) -> Score {
        if self.should_stop() {
            return 0;
        }
        self.nodes.fetch_add(1, Ordering::Relaxed);

        if ply as usize >= MAX_PLY - 1 {
            return evaluation::evaluate(&self.board);
        }

        let original_alpha = alpha;
        let key = self.board.get_hash();

        let tt_entry = self.tables.tt.probe(key);
        if let Some(entry) = tt_entry {
            if i32::from(entry.depth) >= depth {
                let tt_score = score_from_tt(Score::from(entry.score), ply);
                match entry.bound {
                    Bound::Exact => return tt_score,
                    Bound::Lower => alpha = alpha.max(tt_score),
                    Bound::Upper => beta = beta.min(tt_score),
                }
                if alpha >= beta {
                    return tt_score;
                }
            }
        }

        if depth <= 0 {
            pv.clear();
            return self.qsearch(alpha, beta, ply);
        }
        if self.board.is_draw() {
            return DRAW_SCORE;
        }

        let us = self.board.side_to_move();
        let in_check = self.board.in_check(us);
        let static_eval = evaluation::evaluate(&self.board);

        // Razoring: hopeless shallow nodes drop straight into quiescence
        if !in_check
            && depth <= 2
            && tt_entry.is_none()
            && static_eval + RAZOR_MARGIN[depth as usize] <= alpha
        {
            let score = self.qsearch(alpha, beta, ply);
            if score <= alpha {
                return score;
            }
        }

        // Null-move pruning; make_null_move refuses when in check
        if allow_null && depth >= 3 && !in_check && static_eval >= beta && self.board.make_null_move()
        {
            let reduction = 2 + depth / 4;
            let mut null_pv = Vec::new();
            let score = -self.negamax(
                depth - 1 - reduction,
                -beta,
                -beta + 1,
                ply + 1,
                &mut null_pv,
                false,
            );
            self.board.undo_null_move();
            if score >= beta {
                return score;
            }
        }

        let mut moves = generate(&mut self.board, GenType::Legal);
        if moves.is_empty() {
            return if in_check {
                -CHECKMATE + ply
            } else {
                DRAW_SCORE
            };
        }
        self.order_moves(&mut moves, tt_entry.map(|e| e.best_move), ply);

        let is_pv_node = beta - alpha > 1;
        let mut best_score = -INFINITY;
        let mut best_move = Move::NULL_MOVE;
        let mut searched = 0;

        for index in 0..moves.len() {
            let mv = moves.get(index).unwrap();
            if !self.board.make_move(mv) {
                continue;
            }
            searched += 1;

            let gives_check = self.board.in_check(self.board.side_to_move());
            let quiet = !mv.is_capture() && !mv.is_promotion();

            // Futility pruning at frontier nodes outside the PV; the first
            // legal move is always searched
            if searched > 1
                && !in_check
                && !gives_check
                && quiet
                && depth <= 3
                && !is_pv_node
                && static_eval + FUTILITY_MARGIN[depth as usize] <= alpha
            {
                self.board.undo_move();
                continue;
            }
            // Late move pruning
            if searched > 1 && depth <= 3 && quiet && !gives_check && index > (8 + depth) as usize {
                self.board.undo_move();
                continue;
            }

            let extension = i32::from(gives_check);
            let new_depth = depth - 1 + extension;

            let mut child_pv = Vec::new();
            let score = if searched == 1 {
                -self.negamax(new_depth, -beta, -alpha, ply + 1, &mut child_pv, true)
            } else {
                let reduction = if quiet && !gives_check {
                    1 + i32::from(index > 4) + i32::from(depth >= 5)
                } else {
                    0
                };
                let mut score = -self.negamax(
                    new_depth - reduction,
                    -alpha - 1,
                    -alpha,
                    ply + 1,
                    &mut child_pv,
                    true,
                );
                if score > alpha {
                    child_pv.clear();
                    score = -self.negamax(new_depth, -beta, -alpha, ply + 1, &mut child_pv, true);
                }
                score
            };
            self.board.undo_move();

            if self.stop.load(Ordering::Acquire) {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
            if alpha >= beta {
                if quiet {
                    self.tables.history[us as usize][mv.origin()][mv.target()] += depth * depth;
                    let killers = &mut self.tables.killers[ply as usize];
                    if killers[0] != mv {
                        killers[1] = killers[0];
                        killers[0] = mv;
                    }
                }
                break;
            }
        }

        if self.should_stop() {
            return best_score;
        }

        let bound = if best_score <= original_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tables.tt.store(
            key,
            depth,
            score_to_tt(best_score, ply),
            static_eval,
            bound,
            best_move,
        );
        best_score
    }

    fn qsearch(&mut self, mut alpha: Score, beta: Score, ply: i32) -> Score {
        if self.should_stop() {
            return 0;
        }
        self.nodes.fetch_add(1, Ordering::Relaxed);

        let stand_pat = evaluation::evaluate(&self.board);
        if stand_pat >= beta {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = generate(&mut self.board, GenType::PseudoLegal);
        moves.retain(|m| m.is_capture() || m.is_promotion());
        moves.score_with(|m| {
            let mut score = 0;
            if let Some(captured) = m.captured_type() {
                score += PIECE_TYPE_VALUE[captured as usize] * 100 - (m.moved_type() as Score + 1);
            }
            if m.is_promotion() {
                score += 50_000;
            }
            score
        });
        moves.sort();

        for index in 0..moves.len() {
            let mv = moves.get(index).unwrap();

            // Delta pruning: even winning this capture cannot lift alpha
            let captured_value = mv
                .captured_type()
                .map(|p| PIECE_TYPE_VALUE[p as usize])
                .unwrap_or(0);
            let promotion_gain = if mv.is_promotion() {
                PIECE_TYPE_VALUE[PieceType::Queen as usize]
                    - PIECE_TYPE_VALUE[PieceType::Pawn as usize]
            } else {
                0
            };
            if stand_pat + captured_value + promotion_gain + DELTA_MARGIN < alpha {
                continue;
            }

            if !self.board.make_move(mv) {
                continue;
            }
            let score = -self.qsearch(-beta, -alpha, ply + 1);
            self.board.undo_move();

            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    fn order_moves(&self, moves: &mut MoveList, tt_move: Option<u16>, ply: i32) {
        let us = self.board.side_to_move() as usize;
        let killers = self.tables.killers[ply as usize];
        let history = &self.tables.history[us];

        moves.score_with(|m| {
            if tt_move == Some(pack_move(m)) {
                return 300_000;
            }
            if m.is_capture() {
                let victim = PIECE_TYPE_VALUE[m.captured_type().unwrap() as usize];
                let attacker = m.moved_type() as Score + 1;
                return 100_000 + victim * 100 - attacker;
            }
            let mut score = 0;
            if m == killers[0] {
                score += 90_000;
            } else if m == killers[1] {
                score += 80_000;
            }
            score + history[m.origin()][m.target()]
        });
        moves.sort();
    }
}

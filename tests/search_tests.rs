//! Depth- and time-limited searches through the public worker interface.

use redfin::board::Board;
use redfin::evaluation::CHECKMATE;
use redfin::move_generator::{generate, GenType};
use redfin::search::{Search, SearchLimits};

fn depth_limits(depth: i32) -> SearchLimits {
    SearchLimits {
        depth,
        ..Default::default()
    }
}

#[test]
fn best_move_is_legal_at_startpos() {
    let board = Board::startpos();
    let mut search = Search::new();
    search.start(&board, depth_limits(4));
    let report = search.wait().expect("worker must produce a report");

    // the default 1s budget may clip the last iterations on slow builds
    assert!((1..=4).contains(&report.depth));
    assert!(report.nodes > 0);
    let mut check_board = board.clone();
    let legal = generate(&mut check_board, GenType::Legal);
    assert!(
        legal.contains(report.best_move),
        "{} is not legal at startpos",
        report.best_move
    );
    assert_eq!(report.pv.first(), Some(&report.best_move));
}

#[test]
fn finds_mate_in_one() {
    let board = Board::from_fen("7k/8/5KQ1/8/8/8/8/8 w - - 0 1").unwrap();
    let mut search = Search::new();
    search.start(&board, depth_limits(3));
    let report = search.wait().unwrap();

    assert_eq!(report.best_move.to_string(), "g6g7");
    assert_eq!(report.score, CHECKMATE - 1);
}

#[test]
fn finds_the_hanging_queen() {
    // black just blundered its queen onto h4 against an open pawn shield
    let board =
        Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/7q/5PP1/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    let mut search = Search::new();
    search.start(&board, depth_limits(4));
    let report = search.wait().unwrap();
    assert_eq!(report.best_move.to_string(), "g3h4", "gxh4 wins the queen");
}

#[test]
fn mated_position_reports_null_move() {
    let board =
        Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 2").unwrap();
    let mut search = Search::new();
    search.start(&board, depth_limits(1));
    let report = search.wait().unwrap();
    assert!(report.best_move.is_null(), "no move exists in a mated position");
}

#[test]
fn stalemate_scores_zero() {
    let board = Board::from_fen("7k/5Q2/8/8/8/8/8/K7 b - - 0 1").unwrap();
    let mut search = Search::new();
    search.start(&board, depth_limits(2));
    let report = search.wait().unwrap();
    assert!(report.best_move.is_null());
    assert_eq!(report.score, 0);
}

#[test]
fn movetime_caps_the_search() {
    let board = Board::startpos();
    let mut search = Search::new();
    let limits = SearchLimits {
        movetime_ms: 100,
        ..Default::default()
    };
    let start = std::time::Instant::now();
    search.start(&board, limits);
    let report = search.wait().unwrap();
    assert!(
        start.elapsed() < std::time::Duration::from_secs(10),
        "movetime must terminate the search"
    );
    assert!(!report.best_move.is_null());
}

#[test]
fn stop_interrupts_an_infinite_search() {
    let board = Board::startpos();
    let mut search = Search::new();
    let limits = SearchLimits {
        infinite: true,
        ..Default::default()
    };
    search.start(&board, limits);
    std::thread::sleep(std::time::Duration::from_millis(50));
    let report = search.stop().expect("stopping returns the last report");
    assert!(!report.best_move.is_null());
}

#[test]
fn searches_can_be_rerun_on_the_same_engine() {
    let mut search = Search::new();
    let first = Board::startpos();
    search.start(&first, depth_limits(3));
    let report_a = search.wait().unwrap();

    let second =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    search.start(&second, depth_limits(3));
    let report_b = search.wait().unwrap();

    assert!(!report_a.best_move.is_null());
    assert!(!report_b.best_move.is_null());
    let mut check_board = second.clone();
    assert!(generate(&mut check_board, GenType::Legal).contains(report_b.best_move));
}

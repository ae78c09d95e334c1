#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use mimalloc::MiMalloc;
use std::time::Instant;

use crate::board::Board;
use crate::move_generator::{generate, GenType};

pub mod bitboard;
pub mod board;
pub mod castling;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod r#move;
pub mod move_generator;
pub mod movelist;
pub mod piece;
pub mod search;
pub mod square;
pub mod transposition_table;
pub mod uci;
pub mod zob_hash;

/// Runs a perft test from the given FEN (or the starting position),
/// printing node counts up to the requested depth
pub fn perft(depth: u32, fen: Option<String>) {
    let mut board = match fen {
        None => Board::startpos(),
        Some(f) => match Board::from_fen(&f) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("bad FEN: {}", e);
                return;
            }
        },
    };
    println!("{}\n", board);
    println!("depth nodes\n-----------");
    for d in 0..=depth {
        let start = Instant::now();
        let nodes = perft_count(&mut board, d);
        let elapsed = start.elapsed();
        println!(
            "{}     {} ({}s, {} nps)",
            d,
            nodes,
            elapsed.as_secs_f32(),
            nodes as f32 / elapsed.as_secs_f32()
        );
    }
}

/// Counts the leaf nodes of the legal move tree at a fixed depth
pub fn perft_count(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate(board, GenType::Legal);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for mv in moves.iter() {
        board.make_move(mv);
        nodes += perft_count(board, depth - 1);
        board.undo_move();
    }
    nodes
}

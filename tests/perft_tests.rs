//! Perft node counts against the published reference values.
//! https://www.chessprogramming.org/Perft_Results

use redfin::board::Board;
use redfin::perft_count;

#[test]
fn startpos_shallow() {
    let mut board = Board::startpos();
    assert_eq!(perft_count(&mut board, 1), 20);
    assert_eq!(perft_count(&mut board, 2), 400);
    assert_eq!(perft_count(&mut board, 3), 8_902);
    assert_eq!(perft_count(&mut board, 4), 197_281);
}

#[test]
fn startpos_depth_five() {
    let mut board = Board::startpos();
    assert_eq!(perft_count(&mut board, 5), 4_865_609);
}

#[test]
fn kiwipete_depth_three() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    assert_eq!(perft_count(&mut board, 1), 48);
    assert_eq!(perft_count(&mut board, 2), 2_039);
    assert_eq!(perft_count(&mut board, 3), 97_862);
}

#[test]
fn en_passant_heavy_position_depth_four() {
    let mut board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -").unwrap();
    assert_eq!(perft_count(&mut board, 4), 43_238);
}

#[test]
fn perft_leaves_the_board_untouched() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let before = board.clone();
    perft_count(&mut board, 3);
    assert_eq!(board, before);
}

use criterion::{criterion_group, criterion_main, Criterion};
use redfin::board::Board;
use redfin::perft_count;

fn perft_bench(c: &mut Criterion) {
    // The positions are taken from the chess programming wiki
    // https://www.chessprogramming.org/Perft_Results
    let mut board = Board::startpos();
    c.bench_function("perft initial 4", |b| b.iter(|| perft_count(&mut board, 4)));
    board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap();
    c.bench_function("perft kiwipete 3", |b| b.iter(|| perft_count(&mut board, 3)));
    board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
    c.bench_function("perft endgame 4", |b| b.iter(|| perft_count(&mut board, 4)));
}

criterion_group!(benches, perft_bench);
criterion_main!(benches);

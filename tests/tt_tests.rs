//! Transposition table sizing, replacement and mate-score normalization.

use redfin::evaluation::CHECKMATE;
use redfin::piece::PieceType;
use redfin::r#move::Move;
use redfin::transposition_table::{
    pack_move, score_from_tt, score_to_tt, Bound, TTEntry, TranspositionTable,
};
use std::mem::size_of;

#[test]
fn zero_megabytes_still_holds_one_entry() {
    let tt = TranspositionTable::new(0);
    assert_eq!(tt.capacity(), 1);
}

#[test]
fn capacity_is_a_power_of_two_within_budget() {
    let entry_size = size_of::<TTEntry>();
    for mb in [1, 2, 3, 7, 64] {
        let tt = TranspositionTable::new(mb);
        let capacity = tt.capacity();
        assert!(capacity.is_power_of_two(), "{} MB -> {}", mb, capacity);
        assert!(
            capacity * entry_size <= mb * 1024 * 1024,
            "{} entries exceed the {} MB budget",
            capacity,
            mb
        );
        assert!(
            capacity * 2 * entry_size > mb * 1024 * 1024,
            "{} MB table is smaller than it could be",
            mb
        );
    }
}

#[test]
fn probe_returns_only_exact_key_matches() {
    let mut tt = TranspositionTable::new(1);
    let mv = Move::new_quiet(12, 28, PieceType::Pawn);
    tt.store(0xDEAD_BEEF, 5, 42, 10, Bound::Exact, mv);

    let entry = tt.probe(0xDEAD_BEEF).expect("stored entry must probe back");
    assert_eq!(entry.score, 42);
    assert_eq!(entry.static_eval, 10);
    assert_eq!(entry.depth, 5);
    assert_eq!(entry.bound, Bound::Exact);
    assert_eq!(entry.best_move, pack_move(mv));

    // same slot index, different key: must miss
    let colliding = 0xDEAD_BEEF ^ ((tt.capacity() as u64) << 40);
    assert!(tt.probe(colliding).is_none());
}

#[test]
fn replacement_prefers_deeper_entries() {
    let mut tt = TranspositionTable::new(1);
    let mv = Move::new_quiet(12, 28, PieceType::Pawn);
    tt.store(1, 6, 100, 0, Bound::Exact, mv);

    // a shallower result for the same key must not clobber the deep one
    tt.store(1, 3, -50, 0, Bound::Upper, mv);
    assert_eq!(tt.probe(1).unwrap().score, 100);

    // equal depth replaces
    tt.store(1, 6, 77, 0, Bound::Lower, mv);
    assert_eq!(tt.probe(1).unwrap().score, 77);
}

#[test]
fn different_key_always_replaces() {
    let mut tt = TranspositionTable::new(0);
    let mv = Move::new_quiet(12, 28, PieceType::Pawn);
    tt.store(1, 6, 100, 0, Bound::Exact, mv);
    // capacity 1: key 2 lands in the same slot and evicts despite lower depth
    tt.store(2, 1, 5, 0, Bound::Exact, mv);
    assert!(tt.probe(1).is_none());
    assert_eq!(tt.probe(2).unwrap().score, 5);
}

#[test]
fn clear_empties_the_table() {
    let mut tt = TranspositionTable::new(1);
    tt.store(99, 4, 1, 0, Bound::Exact, Move::NULL_MOVE);
    tt.clear();
    assert!(tt.probe(99).is_none());
}

#[test]
fn packed_move_keeps_from_to_and_promotion() {
    let quiet = Move::new_quiet(12, 28, PieceType::Pawn);
    assert_eq!(pack_move(quiet) & 63, 12);
    assert_eq!((pack_move(quiet) >> 6) & 63, 28);
    assert_eq!(pack_move(quiet) >> 12, 0, "no promotion packs to zero");

    let promo = Move::new_promotion(52, 60, PieceType::Queen);
    assert_eq!(pack_move(promo) >> 12, PieceType::Queen as u16 + 1);
    // promotions to different pieces must not collide
    assert_ne!(
        pack_move(Move::new_promotion(52, 60, PieceType::Knight)),
        pack_move(promo)
    );
}

#[test]
fn mate_scores_are_ply_normalized() {
    // a mate found 7 plies down, stored at ply 3, must read back with the
    // right distance at any other ply
    let root_relative = CHECKMATE - 7;
    let stored = score_to_tt(root_relative, 3);
    assert_eq!(score_from_tt(stored, 3), root_relative);
    assert_eq!(score_from_tt(stored, 5), CHECKMATE - 9);

    let mated = -(CHECKMATE - 7);
    let stored = score_to_tt(mated, 3);
    assert_eq!(score_from_tt(stored, 3), mated);

    // ordinary scores pass through untouched
    assert_eq!(score_to_tt(123, 9), 123);
    assert_eq!(score_from_tt(-45, 12), -45);
}

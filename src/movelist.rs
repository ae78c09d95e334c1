use crate::evaluation::Score;
use crate::r#move::Move;
use std::cmp::Reverse;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: Score,
}

/// A growable list of scored moves, ordered for the search by assigning
/// scores and sorting once, best first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveList {
    moves: Vec<ScoredMove>,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: Vec::with_capacity(64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn push(&mut self, mv: Move) {
        self.moves.push(ScoredMove { mv, score: 0 });
    }

    pub fn get(&self, i: usize) -> Option<Move> {
        self.moves.get(i).map(|sm| sm.mv)
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.moves.iter().any(|sm| sm.mv == mv)
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().map(|sm| sm.mv)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        self.moves.retain(|sm| keep(sm.mv));
    }

    pub fn score_with(&mut self, scoring_function: impl Fn(Move) -> Score) {
        for sm in &mut self.moves {
            sm.score = scoring_function(sm.mv);
        }
    }

    /// Sorts the list best first (descending score).
    pub fn sort(&mut self) {
        self.moves.sort_by_key(|sm| Reverse(sm.score));
    }
}

impl std::fmt::Display for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut s = String::new();
        for m in self.iter() {
            s.push_str(&format!("{} ", m))
        }
        write!(f, "{}", s.trim())
    }
}

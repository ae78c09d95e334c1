use crate::piece::Color;
use std::fmt::{Display, Formatter};

/// Castling rights as a 4-bit set: WK | WQ | BK | BQ.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const WHITE_KINGSIDE: u8 = 0b0001;
    const WHITE_QUEENSIDE: u8 = 0b0010;
    const BLACK_KINGSIDE: u8 = 0b0100;
    const BLACK_QUEENSIDE: u8 = 0b1000;

    pub fn none() -> CastlingRights {
        CastlingRights(0)
    }
    pub fn all() -> CastlingRights {
        CastlingRights(0b1111)
    }

    pub fn from_fen(s: &str) -> CastlingRights {
        let mut rights = CastlingRights(0);
        if s.contains('K') {
            rights.0 |= Self::WHITE_KINGSIDE
        }
        if s.contains('Q') {
            rights.0 |= Self::WHITE_QUEENSIDE
        }
        if s.contains('k') {
            rights.0 |= Self::BLACK_KINGSIDE
        }
        if s.contains('q') {
            rights.0 |= Self::BLACK_QUEENSIDE
        }
        rights
    }

    /// The raw 4-bit value, used to index the castling Zobrist keys.
    pub fn bits(&self) -> usize {
        self.0 as usize
    }

    /// Returns the (kingside, queenside) rights of a given color
    pub fn get(&self, side: Color) -> (bool, bool) {
        match side {
            Color::White => (
                self.0 & Self::WHITE_KINGSIDE != 0,
                self.0 & Self::WHITE_QUEENSIDE != 0,
            ),
            Color::Black => (
                self.0 & Self::BLACK_KINGSIDE != 0,
                self.0 & Self::BLACK_QUEENSIDE != 0,
            ),
        }
    }

    /// Marks the given side as unable to castle
    pub fn uncastle(&mut self, side: Color) {
        self.0 &= match side {
            Color::White => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            Color::Black => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
        }
    }
    /// Marks the given side as unable to castle kingside
    pub fn uncastle_kingside(&mut self, side: Color) {
        self.0 &= match side {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        }
    }
    /// Marks the given side as unable to castle queenside
    pub fn uncastle_queenside(&mut self, side: Color) {
        self.0 &= match side {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        let (wking, wqueen) = self.get(Color::White);
        let (bking, bqueen) = self.get(Color::Black);
        write!(
            f,
            "{}{}{}{}",
            if wking { "K" } else { "" },
            if wqueen { "Q" } else { "" },
            if bking { "k" } else { "" },
            if bqueen { "q" } else { "" }
        )
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::none()
    }
}

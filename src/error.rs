use thiserror::Error;

/// Failures while loading a position from Forsyth-Edwards notation.
/// The board is left cleared whenever one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN is missing its {0} field")]
    MissingField(&'static str),
    #[error("unknown piece character {0:?} in the placement field")]
    BadPiece(char),
    #[error("side to move must be \"w\" or \"b\", got {0:?}")]
    BadSideToMove(String),
    #[error("malformed en passant square {0:?}")]
    BadEnPassant(String),
    #[error("malformed clock field {0:?}")]
    BadClock(String),
}

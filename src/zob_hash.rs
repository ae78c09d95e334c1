use crate::castling::CastlingRights;
use crate::piece::{Color, Piece};
use crate::square::{file_of, Square};

// Keys are initialized at compile time for reproducibility and
// to avoid init functions
include!(concat!(env!("OUT_DIR"), "/zobrist_keys.rs"));

pub type Hash = u64;

/// Key layout: piece-on-square keys first (color-major, then piece type,
/// then square), followed by the 16 castling-rights keys, the 8 en-passant
/// file keys and the side-to-move key.
pub struct ZobristHasher {}
impl ZobristHasher {
    pub const CASTLING_OFFSET: usize = 768;
    pub const EP_FILE_OFFSET: usize = 784;
    pub const SIDE_TO_MOVE_INDEX: usize = 792;

    pub fn piece_hash(piece: Piece, sq: Square) -> Hash {
        let color_offset = 384 * (piece.color as usize);
        let piece_type_offset = 64 * (piece.piece_type as usize);
        Self::ZOBRIST_KEYS[color_offset + piece_type_offset + sq]
    }

    pub fn castling_hash(castling_rights: CastlingRights) -> Hash {
        Self::ZOBRIST_KEYS[Self::CASTLING_OFFSET + castling_rights.bits()]
    }

    pub fn en_passant_hash(ep_target: Option<Square>) -> Hash {
        match ep_target {
            Some(sq) => Self::ZOBRIST_KEYS[Self::EP_FILE_OFFSET + file_of(sq)],
            None => 0,
        }
    }

    pub fn side_hash() -> Hash {
        Self::ZOBRIST_KEYS[Self::SIDE_TO_MOVE_INDEX]
    }

    pub fn side_to_move_hash(color: Color) -> Hash {
        if color == Color::Black {
            Self::side_hash()
        } else {
            0
        }
    }
}

use crate::bitboard::Bitboard;
use crate::castling::CastlingRights;
use crate::error::FenError;
use crate::history::HistoryEntry;
use crate::move_generator::{generate, GenType};
use crate::piece::{Color, Piece, PieceType};
use crate::r#move::Move;
use crate::square::{make_square, square_representation, Square};
use crate::zob_hash::{Hash, ZobristHasher};
use std::fmt::{Display, Formatter};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The position: an 8x8 mailbox and per (color, piece type) bitboards,
/// kept in agreement on every square, plus the irreversible state needed
/// to undo moves exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pieces: [Option<Piece>; 64],
    bitboards: [[Bitboard; 6]; 2],
    occupancy: [Bitboard; 2],
    occupancy_all: Bitboard,
    side_to_move: Color,
    castling_rights: CastlingRights,
    ep_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,

    states: Vec<HistoryEntry>,
    hash: Hash,
}

impl Board {
    /// Creates an empty board with white to move
    pub fn new() -> Board {
        Board {
            pieces: [None; 64],
            bitboards: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            occupancy_all: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            states: Vec::with_capacity(128),
            hash: 0,
        }
    }

    pub fn startpos() -> Board {
        let mut board = Board::new();
        board.set_startpos();
        board
    }

    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::new();
        board.set_fen(fen)?;
        Ok(board)
    }

    pub fn clear(&mut self) {
        *self = Board::new();
    }

    /// Installs the standard initial position
    pub fn set_startpos(&mut self) {
        // the starting position always parses
        let _ = self.set_fen(STARTPOS_FEN);
    }

    /// Parses a FEN record. Both the 6-field form and the short 4-field form
    /// (clocks omitted) are accepted; on failure the board is left cleared.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.clear();
        if let Err(e) = self.parse_fen_fields(fen) {
            self.clear();
            return Err(e);
        }
        Ok(())
    }

    fn parse_fen_fields(&mut self, fen: &str) -> Result<(), FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or(FenError::MissingField("piece placement"))?;
        let side = fields.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = fields
            .next()
            .ok_or(FenError::MissingField("castling rights"))?;
        let ep = fields.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove = fields.next();
        let fullmove = fields.next();

        let mut sq: i32 = 56;
        for c in placement.chars() {
            if c == '/' {
                sq -= 16;
            } else if let Some(skip) = c.to_digit(10) {
                sq += skip as i32;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::BadPiece(c))?;
                if !(0..64).contains(&sq) {
                    return Err(FenError::BadPiece(c));
                }
                self.add_piece(piece, sq as Square);
                sq += 1;
            }
        }

        self.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::BadSideToMove(side.to_string())),
        };
        self.castling_rights = CastlingRights::from_fen(castling);
        self.ep_target = if ep == "-" {
            None
        } else {
            Some(crate::square::parse_square(ep).ok_or_else(|| FenError::BadEnPassant(ep.to_string()))?)
        };
        self.halfmove_clock = match halfmove {
            Some(s) => s
                .parse()
                .map_err(|_| FenError::BadClock(s.to_string()))?,
            None => 0,
        };
        self.fullmove_number = match fullmove {
            Some(s) => s
                .parse()
                .map_err(|_| FenError::BadClock(s.to_string()))?,
            None => 1,
        };

        // add_piece already folded the piece keys in; complete the hash
        self.hash ^= ZobristHasher::castling_hash(self.castling_rights);
        self.hash ^= ZobristHasher::en_passant_hash(self.ep_target);
        self.hash ^= ZobristHasher::side_to_move_hash(self.side_to_move);
        Ok(())
    }

    pub fn get_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty_counter = 0;
            for file in 0..8 {
                match self.pieces[make_square(file, rank)] {
                    Some(p) => {
                        if empty_counter != 0 {
                            fen.push_str(&empty_counter.to_string());
                            empty_counter = 0;
                        }
                        fen.push_str(&p.to_string());
                    }
                    None => empty_counter += 1,
                }
            }
            if empty_counter != 0 {
                fen.push_str(&empty_counter.to_string());
            }
            if rank != 0 {
                fen.push('/');
            }
        }
        fen.push(' ');
        fen.push_str(&self.side_to_move.to_string());
        fen.push(' ');
        fen.push_str(&self.castling_rights.to_string());
        match self.ep_target {
            Some(sq) => {
                fen.push(' ');
                fen.push_str(&square_representation(sq).unwrap_or_else(|| String::from("-")));
            }
            None => fen.push_str(" -"),
        }
        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    /// Places a piece, keeping mailbox, bitboards, occupancies and hash in step
    pub fn add_piece(&mut self, piece: Piece, sq: Square) {
        self.pieces[sq] = Some(piece);
        self.bitboards[piece.color as usize][piece.piece_type as usize].set(sq);
        self.occupancy[piece.color as usize].set(sq);
        self.occupancy_all.set(sq);
        self.hash ^= ZobristHasher::piece_hash(piece, sq);
    }

    /// Clears the given square, returning the piece that has been removed if any
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let removed = self.pieces[sq].take();
        if let Some(p) = removed {
            self.bitboards[p.color as usize][p.piece_type as usize].unset(sq);
            self.occupancy[p.color as usize].unset(sq);
            self.occupancy_all.unset(sq);
            self.hash ^= ZobristHasher::piece_hash(p, sq);
        }
        removed
    }

    /// Speculatively applies a pseudo-legal move. Returns false, with the
    /// board already restored, if the move leaves the mover's king attacked.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let origin = mv.origin();
        let target = mv.target();
        let us = self.side_to_move;
        let them = us.opposite();

        self.states.push(HistoryEntry {
            hash: self.hash,
            move_played: mv,
            captured_piece: None,
            ep_target: self.ep_target,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
            was_null: false,
        });

        self.hash ^= ZobristHasher::en_passant_hash(self.ep_target);
        self.hash ^= ZobristHasher::castling_hash(self.castling_rights);

        if mv.moved_type() == PieceType::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if mv.is_capture() {
            let capture_square = if mv.is_en_passant() {
                // the captured pawn sits one rank behind the arrival square
                if us == Color::White {
                    target - 8
                } else {
                    target + 8
                }
            } else {
                target
            };
            let captured = self.remove_piece(capture_square);
            self.states.last_mut().unwrap().captured_piece = captured;
        }

        let moved = self.remove_piece(origin).unwrap();
        let placed = match mv.promotion_target() {
            Some(promotion) => Piece::new(us, promotion),
            None => moved,
        };
        self.add_piece(placed, target);

        if mv.is_castle() {
            let (rook_origin, rook_target) = Self::castle_rook_squares(target);
            let rook = self.remove_piece(rook_origin).unwrap();
            self.add_piece(rook, rook_target);
        }

        if moved.piece_type == PieceType::King {
            self.castling_rights.uncastle(us);
        }
        if moved.piece_type == PieceType::Rook {
            self.clear_corner_right(origin);
        }
        if let Some(captured) = self.states.last().unwrap().captured_piece {
            if captured.piece_type == PieceType::Rook {
                self.clear_corner_right(target);
            }
        }

        self.ep_target = if mv.is_double_push() {
            Some((origin + target) / 2)
        } else {
            None
        };

        self.hash ^= ZobristHasher::castling_hash(self.castling_rights);
        self.hash ^= ZobristHasher::en_passant_hash(self.ep_target);
        self.side_to_move = them;
        self.hash ^= ZobristHasher::side_hash();
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        if self.in_check(us) {
            self.undo_move();
            return false;
        }
        true
    }

    /// Unmakes the move on top of the state stack
    pub fn undo_move(&mut self) {
        let state = match self.states.pop() {
            Some(s) => s,
            None => return,
        };
        if state.was_null {
            self.restore_null(state);
            return;
        }

        let mv = state.move_played;
        let us = self.side_to_move.opposite();

        let placed = self.remove_piece(mv.target()).unwrap();
        if mv.is_promotion() {
            // demote back to the pawn that promoted
            self.add_piece(Piece::new(us, PieceType::Pawn), mv.origin());
        } else {
            self.add_piece(placed, mv.origin());
        }

        if let Some(captured) = state.captured_piece {
            let capture_square = if mv.is_en_passant() {
                if us == Color::White {
                    mv.target() - 8
                } else {
                    mv.target() + 8
                }
            } else {
                mv.target()
            };
            self.add_piece(captured, capture_square);
        }

        if mv.is_castle() {
            let (rook_origin, rook_target) = Self::castle_rook_squares(mv.target());
            let rook = self.remove_piece(rook_target).unwrap();
            self.add_piece(rook, rook_origin);
        }

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = us;
        self.castling_rights = state.castling_rights;
        self.ep_target = state.ep_target;
        self.halfmove_clock = state.halfmove_clock;
        self.hash = state.hash;
    }

    /// Passes the turn. Fails when the side to move is in check.
    pub fn make_null_move(&mut self) -> bool {
        if self.in_check(self.side_to_move) {
            return false;
        }
        self.states.push(HistoryEntry {
            hash: self.hash,
            move_played: Move::NULL_MOVE,
            captured_piece: None,
            ep_target: self.ep_target,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
            was_null: true,
        });
        self.hash ^= ZobristHasher::en_passant_hash(self.ep_target);
        self.ep_target = None;
        self.side_to_move = self.side_to_move.opposite();
        self.hash ^= ZobristHasher::side_hash();
        true
    }

    pub fn undo_null_move(&mut self) {
        if let Some(state) = self.states.pop() {
            self.restore_null(state);
        }
    }

    fn restore_null(&mut self, state: HistoryEntry) {
        self.side_to_move = self.side_to_move.opposite();
        self.ep_target = state.ep_target;
        self.hash = state.hash;
    }

    fn castle_rook_squares(king_target: Square) -> (Square, Square) {
        match king_target {
            6 => (7, 5),
            2 => (0, 3),
            62 => (63, 61),
            _ => (56, 59),
        }
    }

    fn clear_corner_right(&mut self, sq: Square) {
        match sq {
            0 => self.castling_rights.uncastle_queenside(Color::White),
            7 => self.castling_rights.uncastle_kingside(Color::White),
            56 => self.castling_rights.uncastle_queenside(Color::Black),
            63 => self.castling_rights.uncastle_kingside(Color::Black),
            _ => (),
        }
    }

    /*
    ATTACK QUERIES
     */

    /// True iff any piece of `by` attacks the given square under the current
    /// occupancy
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        let pawns = self.bitboards[by as usize][PieceType::Pawn as usize];
        if Bitboard::pawn_attacks(pawns, by).is_set(sq) {
            return true;
        }
        if !(Bitboard::KNIGHT_ATTACKS[sq] & self.bitboards[by as usize][PieceType::Knight as usize])
            .is_empty()
        {
            return true;
        }
        let diagonal = self.bitboards[by as usize][PieceType::Bishop as usize]
            | self.bitboards[by as usize][PieceType::Queen as usize];
        if !(Bitboard::bishop_attacks(sq, self.occupancy_all) & diagonal).is_empty() {
            return true;
        }
        let cardinal = self.bitboards[by as usize][PieceType::Rook as usize]
            | self.bitboards[by as usize][PieceType::Queen as usize];
        if !(Bitboard::rook_attacks(sq, self.occupancy_all) & cardinal).is_empty() {
            return true;
        }
        !(Bitboard::KING_ATTACKS[sq] & self.bitboards[by as usize][PieceType::King as usize])
            .is_empty()
    }

    pub fn in_check(&self, side: Color) -> bool {
        match self.king_square(side) {
            Some(sq) => self.square_attacked(sq, side.opposite()),
            None => false,
        }
    }

    /// Fifty-move rule or threefold repetition against the state stack
    pub fn is_draw(&self) -> bool {
        if self.halfmove_clock >= 100 {
            return true;
        }
        self.states.iter().filter(|st| st.hash == self.hash).count() >= 2
    }

    /*
    MOVE PARSING/FORMATTING
     */

    /// Maps a long-algebraic string to the unique matching legal move,
    /// or the null move if none matches
    pub fn parse_uci_move(&mut self, uci: &str) -> Move {
        let (origin, target, promotion) = match Move::parse(uci) {
            Some(parsed) => parsed,
            None => return Move::NULL_MOVE,
        };
        let legal_moves = generate(self, GenType::Legal);
        let result = legal_moves
            .iter()
            .find(|m| {
                m.origin() == origin && m.target() == target && m.promotion_target() == promotion
            })
            .unwrap_or(Move::NULL_MOVE);
        result
    }

    pub fn move_to_uci(&self, mv: Move) -> String {
        mv.to_string()
    }

    /*
    GETTERS
     */
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn en_passant_target(&self) -> Option<Square> {
        self.ep_target
    }
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
    pub fn get_hash(&self) -> Hash {
        self.hash
    }

    pub fn get_piece_bitboard(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.bitboards[color as usize][piece_type as usize]
    }
    pub fn get_color_bitboard(&self, color: Color) -> Bitboard {
        self.occupancy[color as usize]
    }
    pub fn get_occupancy_bitboard(&self) -> Bitboard {
        self.occupancy_all
    }

    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.pieces[sq]
    }
    pub fn piece_type_on(&self, sq: Square) -> Option<PieceType> {
        self.pieces[sq].map(|p| p.piece_type)
    }
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.pieces[sq].map(|p| p.color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king_bb = self.bitboards[color as usize][PieceType::King as usize];
        if king_bb.is_empty() {
            None
        } else {
            Some(king_bb.ls1b())
        }
    }

    /// A simple iterator over material, each item being a piece type and its
    /// associated bitboard
    pub fn material_iter(&self, color: Color) -> impl Iterator<Item = (PieceType, Bitboard)> + '_ {
        self.bitboards[color as usize]
            .iter()
            .enumerate()
            .map(|(i, bb)| (PieceType::from_determinant(i).unwrap(), *bb))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            let mut line = String::new();
            for file in 0..8 {
                match self.pieces[make_square(file, rank)] {
                    Some(p) => line.push_str(&(p.to_string() + " ")),
                    None => line.push_str(". "),
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        writeln!(f, "side to move: {}", self.side_to_move)?;
        writeln!(f, "castling: {}", self.castling_rights)?;
        writeln!(
            f,
            "en passant: {}",
            match self.ep_target {
                Some(sq) => square_representation(sq).unwrap_or_else(|| String::from("-")),
                None => String::from("-"),
            }
        )?;
        writeln!(
            f,
            "halfmove clock: {} (move {})",
            self.halfmove_clock, self.fullmove_number
        )?;
        writeln!(f, "hash: {:#018x}", self.hash)?;
        write!(f, "fen: {}", self.get_fen())
    }
}

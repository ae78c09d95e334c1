use crate::{
    bitboard::Bitboard,
    board::Board,
    movelist::MoveList,
    piece::{Color, PieceType},
    r#move::Move,
    square::Square,
};

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum GenType {
    Legal,
    PseudoLegal,
}

/// Generates the moves of the side to move. Pseudo-legal moves obey piece
/// movement and castling rules but may leave the mover's king attacked;
/// legal moves are the pseudo-legal ones surviving a trial make/unmake on
/// the live board.
pub fn generate(board: &mut Board, gen_type: GenType) -> MoveList {
    let mut move_list = MoveList::new();
    pawn_moves(board, &mut move_list);
    knight_moves(board, &mut move_list);
    slider_moves(board, &mut move_list);
    king_moves(board, &mut move_list);

    if gen_type == GenType::Legal {
        move_list.retain(|mv| {
            if board.make_move(mv) {
                board.undo_move();
                true
            } else {
                false
            }
        });
    }
    move_list
}

fn pawn_moves(board: &Board, move_list: &mut MoveList) {
    let us = board.side_to_move();
    let pawns_bb = board.get_piece_bitboard(PieceType::Pawn, us);
    let empty = !board.get_occupancy_bitboard();
    let opponents = board.get_color_bitboard(us.opposite());
    let (push_shift, west_shift, east_shift, promotion_rank) = match us {
        Color::White => (8i32, 7i32, 9i32, Bitboard::RANKS[7]),
        Color::Black => (-8, -9, -7, Bitboard::RANKS[0]),
    };

    for target in Bitboard::pawn_pushes(pawns_bb, empty, us) {
        let origin = (target as i32 - push_shift) as Square;
        if promotion_rank.is_set(target) {
            for promotion in Move::all_promotions(origin, target) {
                move_list.push(promotion);
            }
        } else {
            move_list.push(Move::new_quiet(origin, target, PieceType::Pawn));
        }
    }
    for target in Bitboard::pawn_double_pushes(pawns_bb, empty, us) {
        move_list.push(Move::new_double_push(
            (target as i32 - 2 * push_shift) as Square,
            target,
        ));
    }
    for target in Bitboard::pawn_west_attacks(pawns_bb, us) & opponents {
        pawn_capture(
            board,
            move_list,
            (target as i32 - west_shift) as Square,
            target,
            promotion_rank,
        );
    }
    for target in Bitboard::pawn_east_attacks(pawns_bb, us) & opponents {
        pawn_capture(
            board,
            move_list,
            (target as i32 - east_shift) as Square,
            target,
            promotion_rank,
        );
    }

    if let Some(ep_target) = board.en_passant_target() {
        // the capturing pawns sit where an enemy pawn on the EP square
        // would attack
        let origins =
            Bitboard::pawn_attacks(Bitboard::from_square(ep_target), us.opposite()) & pawns_bb;
        for origin in origins {
            move_list.push(Move::new_en_passant(origin, ep_target));
        }
    }
}

fn pawn_capture(
    board: &Board,
    move_list: &mut MoveList,
    origin: Square,
    target: Square,
    promotion_rank: Bitboard,
) {
    let captured = match board.piece_type_on(target) {
        Some(pt) => pt,
        None => return,
    };
    if promotion_rank.is_set(target) {
        for promotion in Move::all_promotion_captures(origin, target, captured) {
            move_list.push(promotion);
        }
    } else {
        move_list.push(Move::new_capture(origin, target, PieceType::Pawn, captured));
    }
}

fn knight_moves(board: &Board, move_list: &mut MoveList) {
    let us = board.side_to_move();
    let own = board.get_color_bitboard(us);
    for origin in board.get_piece_bitboard(PieceType::Knight, us) {
        let targets = Bitboard::KNIGHT_ATTACKS[origin] & !own;
        push_piece_moves(board, move_list, PieceType::Knight, origin, targets);
    }
}

fn slider_moves(board: &Board, move_list: &mut MoveList) {
    let us = board.side_to_move();
    let own = board.get_color_bitboard(us);
    let occupancy = board.get_occupancy_bitboard();

    for origin in board.get_piece_bitboard(PieceType::Bishop, us) {
        let targets = Bitboard::bishop_attacks(origin, occupancy) & !own;
        push_piece_moves(board, move_list, PieceType::Bishop, origin, targets);
    }
    for origin in board.get_piece_bitboard(PieceType::Rook, us) {
        let targets = Bitboard::rook_attacks(origin, occupancy) & !own;
        push_piece_moves(board, move_list, PieceType::Rook, origin, targets);
    }
    for origin in board.get_piece_bitboard(PieceType::Queen, us) {
        let targets = Bitboard::queen_attacks(origin, occupancy) & !own;
        push_piece_moves(board, move_list, PieceType::Queen, origin, targets);
    }
}

fn king_moves(board: &Board, move_list: &mut MoveList) {
    let us = board.side_to_move();
    let king_square = match board.king_square(us) {
        Some(sq) => sq,
        None => return,
    };
    let targets = Bitboard::KING_ATTACKS[king_square] & !board.get_color_bitboard(us);
    push_piece_moves(board, move_list, PieceType::King, king_square, targets);
    castling_moves(board, move_list, king_square);
}

fn castling_moves(board: &Board, move_list: &mut MoveList, king_square: Square) {
    let us = board.side_to_move();
    let them = us.opposite();
    let back_rank = if us == Color::White { 0 } else { 56 };
    // rights can only be exercised from the home square, and never out of check
    if king_square != back_rank + 4 || board.square_attacked(king_square, them) {
        return;
    }

    let occupancy = board.get_occupancy_bitboard();
    let (kingside, queenside) = board.castling_rights().get(us);

    if kingside
        && !occupancy.is_set(back_rank + 5)
        && !occupancy.is_set(back_rank + 6)
        && !board.square_attacked(back_rank + 5, them)
        && !board.square_attacked(back_rank + 6, them)
    {
        move_list.push(Move::new_castle(king_square, back_rank + 6));
    }
    if queenside
        && !occupancy.is_set(back_rank + 1)
        && !occupancy.is_set(back_rank + 2)
        && !occupancy.is_set(back_rank + 3)
        && !board.square_attacked(back_rank + 2, them)
        && !board.square_attacked(back_rank + 3, them)
    {
        move_list.push(Move::new_castle(king_square, back_rank + 2));
    }
}

fn push_piece_moves(
    board: &Board,
    move_list: &mut MoveList,
    moved: PieceType,
    origin: Square,
    targets: Bitboard,
) {
    for target in targets {
        match board.piece_type_on(target) {
            Some(captured) => move_list.push(Move::new_capture(origin, target, moved, captured)),
            None => move_list.push(Move::new_quiet(origin, target, moved)),
        }
    }
}

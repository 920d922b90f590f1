use crate::bitboard::{FILE_A, FILE_H};
use crate::board::{Board, Color, Piece};
use crate::moves::attacks::AttackTables;
use crate::moves::types::Move;
use crate::square::Square;
use crate::utils::pop_lsb;

/// All squares `piece` of `color` attacks from `square` given the blockers.
pub fn attacks_from(
    piece: Piece,
    color: Color,
    square: u8,
    blockers: u64,
    tables: &AttackTables,
) -> u64 {
    let sq = square as usize;
    match piece {
        Piece::Pawn => tables.pawn_attacks(sq, color),
        Piece::Knight => tables.knight_attacks(sq),
        Piece::Bishop => tables.bishop_attacks(sq, blockers),
        Piece::Rook => tables.rook_attacks(sq, blockers),
        Piece::Queen => tables.queen_attacks(sq, blockers),
        Piece::King => tables.king_attacks(sq),
    }
}

/// True if any piece of `attacker` attacks `square`.
///
/// Works outward from the target square: a piece attacks it exactly when
/// the matching attack set from the square contains that piece.
pub fn is_square_attacked(
    board: &Board,
    square: Square,
    attacker: Color,
    tables: &AttackTables,
) -> bool {
    let index = square.index();
    let target = 1u64 << index;

    // Pawn attackers sit one rank behind the target, diagonally.
    let pawn_attackers = match attacker {
        Color::White => ((target & !FILE_H) >> 7) | ((target & !FILE_A) >> 9),
        Color::Black => ((target & !FILE_A) << 7) | ((target & !FILE_H) << 9),
    };
    if pawn_attackers & board.pieces(Piece::Pawn, attacker) != 0 {
        return true;
    }

    if tables.knight_attacks(index as usize) & board.pieces(Piece::Knight, attacker) != 0 {
        return true;
    }
    if tables.king_attacks(index as usize) & board.pieces(Piece::King, attacker) != 0 {
        return true;
    }

    let occupied = board.occupied();

    let rook_rays = tables.rook_attacks(index as usize, occupied);
    if rook_rays & board.pieces(Piece::Rook, attacker) != 0 {
        return true;
    }

    let bishop_rays = tables.bishop_attacks(index as usize, occupied);
    if bishop_rays & board.pieces(Piece::Bishop, attacker) != 0 {
        return true;
    }

    (rook_rays | bishop_rays) & board.pieces(Piece::Queen, attacker) != 0
}

/// Union of the attack sets of every piece of `color`.
pub fn attacked_by(board: &Board, color: Color, tables: &AttackTables) -> u64 {
    let occupied = board.occupied();
    let mut attacked = 0u64;

    for piece in crate::board::PIECES {
        let mut bb = board.pieces(piece, color);
        while bb != 0 {
            let from = pop_lsb(&mut bb);
            attacked |= attacks_from(piece, color, from, occupied, tables);
        }
    }

    attacked
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color, tables: &AttackTables) -> bool {
    let king_sq = board.king_square(side);
    is_square_attacked(board, king_sq, side.opposite(), tables)
}

/// Castling legality beyond rights and emptiness: the king's start,
/// transit and landing squares must all be safe.
pub fn is_legal_castling(board: &Board, mv: Move, tables: &AttackTables) -> bool {
    let color = board.side_to_move;

    let king_path: [u8; 3] = match (color, mv.to.index()) {
        (Color::White, 6) => [4, 5, 6],
        (Color::White, 2) => [4, 3, 2],
        (Color::Black, 62) => [60, 61, 62],
        (Color::Black, 58) => [60, 59, 58],
        _ => return false,
    };

    let opp = color.opposite();
    king_path
        .iter()
        .all(|&idx| !is_square_attacked(board, Square::from_index(idx), opp, tables))
}

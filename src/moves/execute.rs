//! Move execution. `make_move` mutates the board in place and returns an
//! `Undo` record; `unmake_move` restores every field from it, including the
//! hash, which is restored verbatim rather than re-derived because the
//! castling and en-passant contributions are order-dependent.

use crate::board::castle_bits::*;
use crate::board::{Board, Color, EMPTY_SQ, Piece};
use crate::hash::zobrist::{ep_hash_file, xor_castling_rights_delta, zobrist_keys};
use crate::moves::attacks::AttackTables;
use crate::moves::movegen::{generate_pseudo_legal, generate_pseudo_legal_captures};
use crate::moves::square_control::{in_check, is_legal_castling};
use crate::moves::types::{Move, MoveBuffer, Undo};
use crate::square::Square;

/// Rook's (from, to) for a castling move, keyed by the king's landing
/// square.
#[inline(always)]
fn rook_castle_squares(king_to_idx: u8) -> Option<(Square, Square)> {
    match king_to_idx {
        6 => Some((Square::from_index(7), Square::from_index(5))), // white O-O
        2 => Some((Square::from_index(0), Square::from_index(3))), // white O-O-O
        62 => Some((Square::from_index(63), Square::from_index(61))), // black O-O
        58 => Some((Square::from_index(56), Square::from_index(59))), // black O-O-O
        _ => None,
    }
}

/// The castling right lost when a rook leaves (or is captured on) a corner.
#[inline(always)]
fn rights_mask_for_rook(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 0) => CASTLE_WQ,
        (Color::White, 7) => CASTLE_WK,
        (Color::Black, 56) => CASTLE_BQ,
        (Color::Black, 63) => CASTLE_BK,
        _ => 0,
    }
}

#[inline(always)]
fn remove_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) & !(1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

#[inline(always)]
fn place_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) | (1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

/// Execute a pseudo-legal move. Legality is the caller's responsibility.
pub fn make_move(board: &mut Board, mv: Move) -> Undo {
    let prev_zobrist = board.zobrist;
    let color = board.side_to_move;
    let piece = mv.piece;
    let from_idx = mv.from.index() as usize;
    let to_idx = mv.to.index() as usize;

    let prev_en_passant = board.en_passant;
    let prev_halfmove_clock = board.halfmove_clock;
    let prev_fullmove_number = board.fullmove_number;

    // Old en-passant contribution leaves the hash before anything else.
    if let Some(f) = ep_hash_file(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }
    board.en_passant = None;

    // Remove the victim. En passant's victim square differs from `to`.
    let mut capture = None;
    if mv.is_en_passant() {
        let cap_sq = if color == Color::White {
            to_idx - 8
        } else {
            to_idx + 8
        };
        capture = Some((
            color.opposite(),
            Piece::Pawn,
            Square::from_index(cap_sq as u8),
        ));
        remove_piece(board, color.opposite(), Piece::Pawn, cap_sq);
    } else {
        let occupant = board.piece_on_sq[to_idx];
        if occupant != EMPTY_SQ {
            let cap_color = Color::from_u8(occupant >> 3);
            let cap_piece = Piece::from_u8(occupant & 0b111);
            capture = Some((cap_color, cap_piece, mv.to));
            remove_piece(board, cap_color, cap_piece, to_idx);
        }
    }

    let mut undo = Undo {
        from: mv.from,
        to: mv.to,
        piece,
        color,
        capture,
        castling_rook: if mv.is_castling() {
            rook_castle_squares(to_idx as u8)
        } else {
            None
        },
        promotion: mv.promotion,
        prev_castling_rights: board.castling_rights,
        prev_en_passant,
        prev_halfmove_clock,
        prev_fullmove_number,
        prev_zobrist,
        prev_history: None,
    };

    // A double push exposes the skipped square to en passant.
    if mv.is_double_pawn_push() {
        let ep_sq = if color == Color::White {
            from_idx + 8
        } else {
            from_idx - 8
        };
        debug_assert!(
            matches!((color, ep_sq / 8), (Color::White, 2) | (Color::Black, 5)),
            "en-passant square on wrong rank"
        );
        board.en_passant = Some(Square::from_index(ep_sq as u8));
    }

    // Castling-rights losses: king move clears both of its color's rights,
    // a rook leaving or being captured on its corner clears one.
    let old_rights = board.castling_rights;
    let mut mask_to_clear: u8 = 0;
    if piece == Piece::King {
        mask_to_clear |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }
    if piece == Piece::Rook {
        mask_to_clear |= rights_mask_for_rook(color, mv.from.index());
    }
    if let Some((cap_color, Piece::Rook, cap_sq)) = capture {
        mask_to_clear |= rights_mask_for_rook(cap_color, cap_sq.index());
    }

    let new_rights = old_rights & !mask_to_clear;
    if new_rights != old_rights {
        board.castling_rights = new_rights;
        xor_castling_rights_delta(&mut board.zobrist, zobrist_keys(), old_rights, new_rights);
    }

    // Move the piece; a promotion lands as the promoted kind.
    remove_piece(board, color, piece, from_idx);
    if let Some(prom) = mv.promotion {
        debug_assert!(piece == Piece::Pawn, "only pawns promote");
        place_piece(board, color, prom, to_idx);
    } else {
        place_piece(board, color, piece, to_idx);
    }

    if let Some((rook_from, rook_to)) = undo.castling_rook {
        remove_piece(board, color, Piece::Rook, rook_from.index() as usize);
        place_piece(board, color, Piece::Rook, rook_to.index() as usize);
    }

    if capture.is_some() || piece == Piece::Pawn {
        board.halfmove_clock = 0;
    } else {
        board.halfmove_clock = prev_halfmove_clock + 1;
    }
    if color == Color::Black {
        board.fullmove_number = prev_fullmove_number + 1;
    }

    board.side_to_move = color.opposite();
    board.zobrist ^= zobrist_keys().side_to_move;

    if let Some(f) = ep_hash_file(board) {
        board.zobrist ^= zobrist_keys().ep_file[f as usize];
    }

    // Repetition bookkeeping: push the pre-move key; an irreversible move
    // makes every earlier position unrepeatable, so snapshot and truncate.
    let irreversible = capture.is_some() || piece == Piece::Pawn;
    if irreversible {
        undo.prev_history = Some(std::mem::take(&mut board.history));
    }
    board.history.push(prev_zobrist);

    #[cfg(all(debug_assertions, feature = "paranoid_hash"))]
    {
        let full = board.compute_zobrist_full();
        if board.zobrist != full {
            eprintln!(
                "hash drift after {}: stored ^ full = {:#018x}",
                mv,
                board.zobrist ^ full
            );
        }
    }

    #[cfg(debug_assertions)]
    board.assert_hash();

    undo
}

/// Reverse `make_move` exactly.
pub fn unmake_move(board: &mut Board, undo: Undo) {
    board.side_to_move = undo.color;
    board.castling_rights = undo.prev_castling_rights;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.fullmove_number = undo.prev_fullmove_number;
    board.en_passant = undo.prev_en_passant;

    let from_idx = undo.from.index() as usize;
    let to_idx = undo.to.index() as usize;

    // set_bb keeps occupancies and the square table in sync; the hash
    // churn it causes is overwritten below.
    if let Some(prom) = undo.promotion {
        remove_piece(board, undo.color, prom, to_idx);
        place_piece(board, undo.color, Piece::Pawn, from_idx);
    } else {
        remove_piece(board, undo.color, undo.piece, to_idx);
        place_piece(board, undo.color, undo.piece, from_idx);
    }

    if let Some((cap_color, cap_piece, cap_sq)) = undo.capture {
        place_piece(board, cap_color, cap_piece, cap_sq.index() as usize);
    }

    if let Some((rook_from, rook_to)) = undo.castling_rook {
        remove_piece(board, undo.color, Piece::Rook, rook_to.index() as usize);
        place_piece(board, undo.color, Piece::Rook, rook_from.index() as usize);
    }

    board.zobrist = undo.prev_zobrist;

    board.history.pop();
    if let Some(prev) = undo.prev_history {
        board.history = prev;
    }

    #[cfg(debug_assertions)]
    board.assert_hash();
}

/// Filter pseudo-legal moves down to legal ones: castling must have a safe
/// king path, and no move may leave the mover's own king attacked.
pub fn generate_legal(
    board: &mut Board,
    tables: &AttackTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_pseudo_legal(board, tables, scratch);
    moves.clear();

    for i in 0..scratch.len() {
        let mv = scratch[i];
        if mv.is_castling() && !is_legal_castling(board, mv, tables) {
            continue;
        }
        let mover = board.side_to_move;
        let undo = make_move(board, mv);
        let illegal = in_check(board, mover, tables);
        unmake_move(board, undo);
        if !illegal {
            moves.push(mv);
        }
    }
}

/// Legality check for a single pseudo-legal move.
#[inline]
pub fn is_legal_move(board: &mut Board, mv: Move, tables: &AttackTables) -> bool {
    if mv.is_castling() && !is_legal_castling(board, mv, tables) {
        return false;
    }
    let mover = board.side_to_move;
    let undo = make_move(board, mv);
    let illegal = in_check(board, mover, tables);
    unmake_move(board, undo);
    !illegal
}

/// Legal captures only, for quiescence.
pub fn generate_captures(
    board: &mut Board,
    tables: &AttackTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    scratch.clear();
    generate_pseudo_legal_captures(board, tables, scratch);
    moves.clear();

    for i in 0..scratch.len() {
        let mv = scratch[i];
        let mover = board.side_to_move;
        let undo = make_move(board, mv);
        let illegal = in_check(board, mover, tables);
        unmake_move(board, undo);
        if !illegal {
            moves.push(mv);
        }
    }
}

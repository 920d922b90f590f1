use crate::board::{Board, Piece};
use crate::moves::attacks::AttackTables;
use crate::moves::square_control::attacked_by;
use crate::status::is_insufficient_material;

const MATERIAL_PIECES: [Piece; 5] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
];

/// Static evaluation from the side to move's viewpoint: material balance
/// plus a mobility bonus of one point per attacked square.
///
/// Mate and stalemate are the search's to detect (it already has the legal
/// move list there); only the draw states visible from the bare position
/// short-circuit here, to the contempt score.
pub fn evaluate(board: &Board, tables: &AttackTables, contempt: i32) -> i32 {
    if board.halfmove_clock >= 100 || board.is_threefold() || is_insufficient_material(board) {
        return contempt;
    }

    let color = board.side_to_move;
    let enemy = color.opposite();

    let mut score = 0;
    for piece in MATERIAL_PIECES {
        let own = board.pieces(piece, color).count_ones() as i32;
        let theirs = board.pieces(piece, enemy).count_ones() as i32;
        score += (own - theirs) * piece.value();
    }

    // Positions that attack more squares are better.
    score += attacked_by(board, color, tables).count_ones() as i32;

    score
}

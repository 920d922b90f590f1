//! Move-notation input: UCI coordinate moves (`e2e4`, `a7a8q`) and
//! Standard Algebraic Notation (`Nf3`, `axb3`, `O-O`, `e8=Q#`). Both parse
//! by resolving against the legal move list, so anything they accept is
//! playable as-is.

use crate::board::error::NotationError;
use crate::board::{Board, Piece};
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{generate_legal, make_move};
use crate::moves::types::Move;
use crate::square::Square;
use std::str::FromStr;

fn legal_moves(board: &mut Board, tables: &AttackTables) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let mut scratch = Vec::with_capacity(256);
    generate_legal(board, tables, &mut moves, &mut scratch);
    moves
}

/// Parse a UCI move string and resolve it to a legal move.
pub fn parse_uci_move(
    board: &mut Board,
    tables: &AttackTables,
    input: &str,
) -> Result<Move, NotationError> {
    let malformed = || NotationError::Malformed {
        input: input.to_string(),
    };

    if input.len() != 4 && input.len() != 5 {
        return Err(malformed());
    }

    let from = Square::from_str(&input[0..2]).map_err(|_| malformed())?;
    let to = Square::from_str(&input[2..4]).map_err(|_| malformed())?;

    let promotion = match input.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        Some(&ch) => return Err(NotationError::BadPromotion { ch: ch as char }),
    };

    match board.piece_at(from) {
        Some((color, _)) if color == board.side_to_move => {}
        _ => {
            return Err(NotationError::NoMoverPiece {
                input: input.to_string(),
            });
        }
    }

    legal_moves(board, tables)
        .into_iter()
        .find(|m| m.from == from && m.to == to && m.promotion == promotion)
        .ok_or(NotationError::Illegal {
            input: input.to_string(),
        })
}

/// Parse a UCI move and play it. Returns false (board untouched) when the
/// input is malformed or the move illegal.
pub fn try_move_uci(board: &mut Board, tables: &AttackTables, input: &str) -> bool {
    match parse_uci_move(board, tables, input) {
        Ok(mv) => {
            make_move(board, mv);
            true
        }
        Err(_) => false,
    }
}

fn piece_from_letter(ch: char) -> Option<Piece> {
    match ch {
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        _ => None,
    }
}

/// Parse a SAN move and resolve it to a legal move.
///
/// Accepts piece letter (absent for pawns), file and/or rank
/// disambiguation, `x`, destination, `=P` promotion, `+`/`#` suffixes and
/// both castling spellings. Input matching several legal moves is an
/// error, as is input matching none.
pub fn parse_san(
    board: &mut Board,
    tables: &AttackTables,
    input: &str,
) -> Result<Move, NotationError> {
    let malformed = || NotationError::Malformed {
        input: input.to_string(),
    };
    let illegal = || NotationError::Illegal {
        input: input.to_string(),
    };

    let s = input.trim().trim_end_matches(['+', '#']);
    if s.is_empty() {
        return Err(malformed());
    }

    let legal = legal_moves(board, tables);

    if s == "O-O" || s == "0-0" {
        return legal
            .into_iter()
            .find(|m| m.is_kingside_castle())
            .ok_or_else(illegal);
    }
    if s == "O-O-O" || s == "0-0-0" {
        return legal
            .into_iter()
            .find(|m| m.is_queenside_castle())
            .ok_or_else(illegal);
    }

    // Split off "=Q" style promotion.
    let (body, promotion) = match s.find('=') {
        Some(eq) => {
            let ch = s[eq + 1..].chars().next().ok_or_else(malformed)?;
            let piece = match ch {
                'Q' => Piece::Queen,
                'R' => Piece::Rook,
                'B' => Piece::Bishop,
                'N' => Piece::Knight,
                _ => return Err(NotationError::BadPromotion { ch }),
            };
            if s[eq + 1..].chars().count() != 1 {
                return Err(malformed());
            }
            (&s[..eq], Some(piece))
        }
        None => (s, None),
    };

    let chars: Vec<char> = body.chars().collect();
    if chars.len() < 2 {
        return Err(malformed());
    }

    let dest: String = chars[chars.len() - 2..].iter().collect();
    let to = Square::from_str(&dest).map_err(|_| malformed())?;

    let mut rest = &chars[..chars.len() - 2];

    let piece = match rest.first().copied().and_then(piece_from_letter) {
        Some(p) => {
            rest = &rest[1..];
            p
        }
        None => Piece::Pawn,
    };

    let wants_capture = rest.last() == Some(&'x');
    if wants_capture {
        rest = &rest[..rest.len() - 1];
    }

    // What is left is disambiguation: optional file, optional rank.
    let mut dis_file: Option<u8> = None;
    let mut dis_rank: Option<u8> = None;
    for &ch in rest {
        match ch {
            'a'..='h' if dis_file.is_none() => dis_file = Some(ch as u8 - b'a'),
            '1'..='8' if dis_rank.is_none() => dis_rank = Some(ch as u8 - b'1'),
            _ => return Err(malformed()),
        }
    }

    let mut matches = legal.into_iter().filter(|m| {
        m.piece == piece
            && m.to == to
            && m.promotion == promotion
            && dis_file.is_none_or(|f| m.from.file() == f)
            && dis_rank.is_none_or(|r| m.from.rank() == r)
            && (!wants_capture || m.is_capture())
    });

    match (matches.next(), matches.next()) {
        (None, _) => Err(illegal()),
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(NotationError::Ambiguous {
            input: input.to_string(),
        }),
    }
}

/// Parse a SAN move and play it. Returns false (board untouched) when the
/// input is malformed, illegal or ambiguous.
pub fn try_move_san(board: &mut Board, tables: &AttackTables, input: &str) -> bool {
    match parse_san(board, tables, input) {
        Ok(mv) => {
            make_move(board, mv);
            true
        }
        Err(_) => false,
    }
}

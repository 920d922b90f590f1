//! FEN parsing and emission.

use super::error::FenError;
use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use crate::square::Square;
use std::str::FromStr;

fn piece_from_char(ch: char) -> Option<(Color, Piece)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let piece = match ch.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    Some((color, piece))
}

fn piece_to_char(color: Color, piece: Piece) -> char {
    let ch = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => ch.to_ascii_uppercase(),
        Color::Black => ch,
    }
}

impl Board {
    /// Replace the whole position from a FEN string. The two clock fields
    /// may be omitted (common in test positions) and default to `0 1`.
    ///
    /// On error the board is left unchanged.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::MissingFields {
                found: fields.len(),
            });
        }

        let mut b = Board::new_empty();

        // Field 1: placement, ranks 8 down to 1.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount { found: ranks.len() });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(FenError::BadPiece { ch });
                    }
                    file += skip as u8;
                } else {
                    let (color, piece) =
                        piece_from_char(ch).ok_or(FenError::BadPiece { ch })?;
                    if file > 7 {
                        return Err(FenError::BadFileCount { rank: rank as usize + 1 });
                    }
                    let sq = Square::from_file_rank(file, rank);
                    let bb = b.bb(color, piece) | sq.bit();
                    b.set_bb(color, piece, bb);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadFileCount { rank: rank as usize + 1 });
            }
        }

        // Field 2: active color.
        b.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::BadSideToMove {
                    found: other.to_string(),
                });
            }
        };

        // Field 3: castling rights.
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                b.castling_rights |= match ch {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(FenError::BadCastling { ch }),
                };
            }
        }

        // Field 4: en-passant target, rank 3 or 6 only.
        if fields[3] != "-" {
            let sq = Square::from_str(fields[3]).map_err(|_| FenError::BadEnPassant {
                found: fields[3].to_string(),
            })?;
            if sq.rank() != 2 && sq.rank() != 5 {
                return Err(FenError::BadEnPassant {
                    found: fields[3].to_string(),
                });
            }
            b.en_passant = Some(sq);
        }

        // Fields 5 and 6: clocks, defaulted when absent.
        b.halfmove_clock = match fields.get(4) {
            Some(s) => s.parse().map_err(|_| FenError::BadHalfmoveClock {
                found: s.to_string(),
            })?,
            None => 0,
        };
        b.fullmove_number = match fields.get(5) {
            Some(s) => s.parse().map_err(|_| FenError::BadFullmoveNumber {
                found: s.to_string(),
            })?,
            None => 1,
        };
        if b.fullmove_number == 0 {
            return Err(FenError::BadFullmoveNumber {
                found: fields[5].to_string(),
            });
        }

        b.validate()
            .map_err(|reason| FenError::InvalidPosition { reason })?;

        b.refresh_zobrist();
        b.history.clear();
        *self = b;
        Ok(())
    }

    /// Emit the six FEN fields for the current position.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty_run = 0;
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            fen.push(char::from_digit(empty_run, 10).unwrap());
                            empty_run = 0;
                        }
                        fen.push(piece_to_char(color, piece));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push(char::from_digit(empty_run, 10).unwrap());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                fen.push('K');
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                fen.push('Q');
            }
            if self.castling_rights & CASTLE_BK != 0 {
                fen.push('k');
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

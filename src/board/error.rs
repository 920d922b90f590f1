//! Typed errors for position and move-notation parsing.

use std::fmt;

/// A FEN string failed to parse. Each variant names the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Fewer than the four mandatory fields (the clocks may be omitted).
    MissingFields { found: usize },
    /// Placement field does not describe eight ranks.
    BadRankCount { found: usize },
    /// A rank describes more or fewer than eight files.
    BadFileCount { rank: usize },
    /// Unknown glyph in the placement field.
    BadPiece { ch: char },
    /// Active-color field is not `w` or `b`.
    BadSideToMove { found: String },
    /// Castling field contains something outside `KQkq-`.
    BadCastling { ch: char },
    /// En-passant field is neither `-` nor a square on rank 3 or 6.
    BadEnPassant { found: String },
    /// Halfmove clock is not an integer.
    BadHalfmoveClock { found: String },
    /// Fullmove number is not a positive integer.
    BadFullmoveNumber { found: String },
    /// Parsed position breaks a board invariant (king counts, pawn ranks,
    /// overlapping piece sets).
    InvalidPosition { reason: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::MissingFields { found } => {
                write!(f, "FEN needs at least 4 fields, found {found}")
            }
            FenError::BadRankCount { found } => {
                write!(f, "FEN placement needs 8 ranks, found {found}")
            }
            FenError::BadFileCount { rank } => {
                write!(f, "rank {rank} of FEN placement does not span 8 files")
            }
            FenError::BadPiece { ch } => write!(f, "unknown piece glyph '{ch}'"),
            FenError::BadSideToMove { found } => {
                write!(f, "active color must be 'w' or 'b', found '{found}'")
            }
            FenError::BadCastling { ch } => write!(f, "bad castling glyph '{ch}'"),
            FenError::BadEnPassant { found } => {
                write!(f, "bad en-passant square '{found}'")
            }
            FenError::BadHalfmoveClock { found } => {
                write!(f, "bad halfmove clock '{found}'")
            }
            FenError::BadFullmoveNumber { found } => {
                write!(f, "bad fullmove number '{found}'")
            }
            FenError::InvalidPosition { reason } => {
                write!(f, "position violates board invariants: {reason}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// A move string (UCI or SAN) failed to parse or resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Syntactically malformed input.
    Malformed { input: String },
    /// Promotion letter outside `qrbn` (UCI) or `QRBN` (SAN).
    BadPromotion { ch: char },
    /// The `from` square is empty or holds an enemy piece.
    NoMoverPiece { input: String },
    /// Parsed fine but no legal move matches.
    Illegal { input: String },
    /// SAN input matches more than one legal move.
    Ambiguous { input: String },
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::Malformed { input } => write!(f, "malformed move '{input}'"),
            NotationError::BadPromotion { ch } => write!(f, "bad promotion piece '{ch}'"),
            NotationError::NoMoverPiece { input } => {
                write!(f, "no piece of the side to move on the from-square of '{input}'")
            }
            NotationError::Illegal { input } => write!(f, "illegal move '{input}'"),
            NotationError::Ambiguous { input } => write!(f, "ambiguous move '{input}'"),
        }
    }
}

impl std::error::Error for NotationError {}

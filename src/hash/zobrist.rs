//! Zobrist key tables and the helpers shared by the incremental hash
//! updates in move execution and the full recompute on `Board`.

use crate::board::castle_bits::*;
use crate::board::Board;
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

// Fixed seed: the hash must be reproducible across runs so search results
// and stored test positions are stable.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct ZobristKeys {
    /// `[color][piece][square]`, {White=0, Black=1} × {P,N,B,R,Q,K}.
    pub piece: [[[u64; 64]; 6]; 2],
    /// XORed in when black is to move.
    pub side_to_move: u64,
    /// One key per right, order K, Q, k, q. Any rights nibble hashes as the
    /// XOR of its set bits' keys, which covers all 16 combinations.
    pub castling: [u64; 4],
    /// En-passant file, a..h.
    pub ep_file: [u64; 8],
}

/// Global key table, generated on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // A zero key would hash a feature to nothing.
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };

    for c in 0..2 {
        for p in 0..6 {
            for sq in 0..64 {
                keys.piece[c][p][sq] = non_zero(&mut rng);
            }
        }
    }
    for i in 0..4 {
        keys.castling[i] = non_zero(&mut rng);
    }
    for f in 0..8 {
        keys.ep_file[f] = non_zero(&mut rng);
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}

/// XOR the castling contribution for every right that differs between the
/// old and new nibble.
#[inline]
pub fn xor_castling_rights_delta(hash: &mut u64, keys: &ZobristKeys, old: u8, new: u8) {
    let delta = old ^ new;
    if delta & CASTLE_WK != 0 {
        *hash ^= keys.castling[0];
    }
    if delta & CASTLE_WQ != 0 {
        *hash ^= keys.castling[1];
    }
    if delta & CASTLE_BK != 0 {
        *hash ^= keys.castling[2];
    }
    if delta & CASTLE_BQ != 0 {
        *hash ^= keys.castling[3];
    }
}

/// File (0..7) of the en-passant contribution for the current position, or
/// `None` when no en-passant target exists.
#[inline]
pub fn ep_hash_file(board: &Board) -> Option<u8> {
    board.en_passant.map(|sq| sq.file())
}

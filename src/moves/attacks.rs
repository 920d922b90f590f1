//! Precomputed attack tables: one ray per compass direction and square,
//! plus knight, king and pawn attack sets. Sliding attacks are resolved at
//! lookup time by cutting the ray at the first blocker, so no magic
//! multiplication or per-occupancy tables are needed.

use crate::bitboard::BitboardExt;
use crate::board::Color;
use once_cell::sync::OnceCell;

/// Compass directions over the a1 = 0 … h8 = 63 layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

pub const DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Direction {
    /// (file step, rank step).
    #[inline]
    const fn offsets(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Directions that walk toward higher square indices. The nearest
    /// blocker on these rays is found with a forward bitscan, on the rest
    /// with a reverse bitscan.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }
}

pub struct AttackTables {
    /// `ray[sq][dir]`: every square reachable from `sq` walking `dir` to
    /// the board edge, excluding `sq` itself, blockers ignored.
    pub ray: [[u64; 8]; 64],
    pub knight: [u64; 64],
    pub king: [u64; 64],
    /// `pawn[color][sq]`: squares a pawn of `color` on `sq` attacks.
    pub pawn: [[u64; 64]; 2],
}

/// Global tables, built on first use.
pub fn attack_tables() -> &'static AttackTables {
    static TABLES: OnceCell<AttackTables> = OnceCell::new();
    TABLES.get_or_init(AttackTables::build)
}

fn set_if_on_board(bb: &mut u64, file: i8, rank: i8) {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        bb.set((rank * 8 + file) as u8);
    }
}

impl AttackTables {
    fn build() -> Self {
        let mut tables = AttackTables {
            ray: [[0u64; 8]; 64],
            knight: [0u64; 64],
            king: [0u64; 64],
            pawn: [[0u64; 64]; 2],
        };
        tables.build_rays();
        tables.build_knight();
        tables.build_king();
        tables.build_pawn();
        tables
    }

    fn build_rays(&mut self) {
        for sq in 0..64usize {
            let file = (sq % 8) as i8;
            let rank = (sq / 8) as i8;
            for dir in DIRECTIONS {
                let (df, dr) = dir.offsets();
                let bb = &mut self.ray[sq][dir as usize];
                let (mut f, mut r) = (file + df, rank + dr);
                while (0..8).contains(&f) && (0..8).contains(&r) {
                    bb.set((r * 8 + f) as u8);
                    f += df;
                    r += dr;
                }
            }
        }
    }

    fn build_knight(&mut self) {
        const JUMPS: [(i8, i8); 8] = [
            (1, 2),
            (-1, 2),
            (1, -2),
            (-1, -2),
            (2, 1),
            (-2, 1),
            (2, -1),
            (-2, -1),
        ];
        for sq in 0..64usize {
            let file = (sq % 8) as i8;
            let rank = (sq / 8) as i8;
            for (df, dr) in JUMPS {
                set_if_on_board(&mut self.knight[sq], file + df, rank + dr);
            }
        }
    }

    fn build_king(&mut self) {
        for sq in 0..64usize {
            let file = (sq % 8) as i8;
            let rank = (sq / 8) as i8;
            for df in -1..=1 {
                for dr in -1..=1 {
                    if df != 0 || dr != 0 {
                        set_if_on_board(&mut self.king[sq], file + df, rank + dr);
                    }
                }
            }
        }
    }

    fn build_pawn(&mut self) {
        for sq in 0..64usize {
            let file = (sq % 8) as i8;
            let rank = (sq / 8) as i8;
            for df in [-1, 1] {
                set_if_on_board(&mut self.pawn[Color::White as usize][sq], file + df, rank + 1);
                set_if_on_board(&mut self.pawn[Color::Black as usize][sq], file + df, rank - 1);
            }
        }
    }

    /// Ray attacks toward higher indices, cut at the first blocker
    /// (the blocker square itself stays attackable).
    #[inline]
    pub fn positive_ray_attacks(&self, sq: usize, dir: Direction, occupied: u64) -> u64 {
        debug_assert!(dir.is_positive());
        let mut attacks = self.ray[sq][dir as usize];
        let blockers = attacks & occupied;
        if blockers != 0 {
            attacks ^= self.ray[blockers.lsb() as usize][dir as usize];
        }
        attacks
    }

    /// Ray attacks toward lower indices, symmetric with a reverse scan.
    #[inline]
    pub fn negative_ray_attacks(&self, sq: usize, dir: Direction, occupied: u64) -> u64 {
        debug_assert!(!dir.is_positive());
        let mut attacks = self.ray[sq][dir as usize];
        let blockers = attacks & occupied;
        if blockers != 0 {
            attacks ^= self.ray[blockers.msb() as usize][dir as usize];
        }
        attacks
    }

    #[inline]
    pub fn rook_attacks(&self, sq: usize, occupied: u64) -> u64 {
        self.positive_ray_attacks(sq, Direction::North, occupied)
            | self.positive_ray_attacks(sq, Direction::East, occupied)
            | self.negative_ray_attacks(sq, Direction::South, occupied)
            | self.negative_ray_attacks(sq, Direction::West, occupied)
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: usize, occupied: u64) -> u64 {
        self.positive_ray_attacks(sq, Direction::NorthEast, occupied)
            | self.positive_ray_attacks(sq, Direction::NorthWest, occupied)
            | self.negative_ray_attacks(sq, Direction::SouthEast, occupied)
            | self.negative_ray_attacks(sq, Direction::SouthWest, occupied)
    }

    #[inline]
    pub fn queen_attacks(&self, sq: usize, occupied: u64) -> u64 {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }

    #[inline(always)]
    pub fn knight_attacks(&self, sq: usize) -> u64 {
        self.knight[sq]
    }

    #[inline(always)]
    pub fn king_attacks(&self, sq: usize) -> u64 {
        self.king[sq]
    }

    #[inline(always)]
    pub fn pawn_attacks(&self, sq: usize, color: Color) -> u64 {
        self.pawn[color as usize][sq]
    }
}

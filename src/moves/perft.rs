//! Perft: exhaustive legal-move tree counting, the move generator's
//! ground-truth test. `perft_divide` prints per-root-move subtotals for
//! chasing down a miscount.

use crate::board::Board;
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{generate_legal, make_move, unmake_move};
use crate::moves::types::Move;
use tracing::{debug, instrument};

const MAX_PERFT_DEPTH: usize = 16;

fn create_move_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn create_scratch_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(256))
}

fn perft_recursive(
    board: &mut Board,
    tables: &AttackTables,
    depth: u32,
    move_buffers: &mut [Vec<Move>],
    scratch_buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    // Split the buffer array so this ply and deeper plies borrow disjointly.
    let (head, tail) = move_buffers.split_first_mut().unwrap();
    let (scratch_head, scratch_tail) = scratch_buffers.split_first_mut().unwrap();
    generate_legal(board, tables, head, scratch_head);

    if depth == 1 {
        return head.len() as u64;
    }

    let mut nodes = 0;
    for i in 0..head.len() {
        let mv = head[i];

        #[cfg(debug_assertions)]
        let key_before = board.zobrist;

        let undo = make_move(board, mv);
        nodes += perft_recursive(board, tables, depth - 1, tail, scratch_tail);
        unmake_move(board, undo);

        #[cfg(debug_assertions)]
        debug_assert_eq!(board.zobrist, key_before, "zobrist changed across make/unmake");
    }
    nodes
}

/// Leaf count of the legal move tree, `perft(0) = 1`.
#[instrument(skip(board, tables))]
pub fn perft(board: &mut Board, tables: &AttackTables, depth: u32) -> u64 {
    assert!(
        (depth as usize) <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );

    let mut move_buffers = create_move_buffers();
    let mut scratch_buffers = create_scratch_buffers();
    perft_recursive(board, tables, depth, &mut move_buffers, &mut scratch_buffers)
}

/// Per-root-move subtotals, printed in `move: count` lines, returning the
/// overall total.
#[instrument(skip(board, tables))]
pub fn perft_divide(board: &mut Board, tables: &AttackTables, depth: u32) -> u64 {
    assert!(
        depth >= 1 && (depth as usize) <= MAX_PERFT_DEPTH,
        "divide depth {} out of range",
        depth
    );

    let mut move_buffers = create_move_buffers();
    let mut scratch_buffers = create_scratch_buffers();

    let (head, tail) = move_buffers.split_first_mut().unwrap();
    let (scratch_head, scratch_tail) = scratch_buffers.split_first_mut().unwrap();
    generate_legal(board, tables, head, scratch_head);
    debug!(depth, root_moves = head.len(), "divide");

    let mut total = 0;
    for i in 0..head.len() {
        let mv = head[i];
        let undo = make_move(board, mv);
        let count = perft_recursive(board, tables, depth - 1, tail, scratch_tail);
        unmake_move(board, undo);

        println!("{}: {}", mv, count);
        total += count;
    }

    println!("Total: {}", total);
    total
}

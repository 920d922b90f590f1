//! Iterative-deepening negamax with alpha-beta pruning, a quiescence
//! extension and transposition-table cutoffs. Cancellation is cooperative:
//! the stop flag is polled at every node, the clock every 1024 nodes, and
//! the result is always the last *completed* iteration's move.

use crate::board::Board;
use crate::moves::attacks::AttackTables;
use crate::moves::execute::{generate_captures, generate_legal, make_move, unmake_move};
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::eval::evaluate;
use crate::search::ordering::order_moves;
use crate::search::tt::{NodeType, TranspositionTable};
use arrayvec::ArrayVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub const INF: i32 = 32000;
pub const MATE_SCORE: i32 = 31000;
/// Scores beyond this are mate-in-N; the gap to `MATE_SCORE` encodes the
/// distance so shorter mates compare higher.
pub const MATE_THRESHOLD: i32 = 30000;

type MoveList = ArrayVec<Move, 256>;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Hard depth cap for iterative deepening.
    pub max_depth: i32,
    /// Stop deepening once an iteration completes past this.
    pub soft_limit: Duration,
    /// Abort mid-iteration past this (UCI `movetime`).
    pub hard_limit: Option<Duration>,
    /// Draw score from the engine's viewpoint; slightly negative values
    /// make the engine avoid draws when ahead.
    pub contempt: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            soft_limit: Duration::from_millis(1500),
            hard_limit: None,
            contempt: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: i32,
    pub nodes: u64,
    pub qnodes: u64,
}

/// Tracks the clock and the external stop flag for one search.
pub struct TimeManager<'a> {
    pub start: Instant,
    hard_limit: Option<Duration>,
    stop: &'a AtomicBool,
    aborted: bool,
}

impl<'a> TimeManager<'a> {
    pub fn new(hard_limit: Option<Duration>, stop: &'a AtomicBool) -> Self {
        Self {
            start: Instant::now(),
            hard_limit,
            stop,
            aborted: false,
        }
    }

    /// Cheap per-node poll: one relaxed atomic load.
    #[inline(always)]
    fn should_stop(&mut self) -> bool {
        if !self.aborted && self.stop.load(Ordering::Relaxed) {
            self.aborted = true;
        }
        self.aborted
    }

    /// Clock check, paced by the caller (reading the clock is not free).
    #[inline]
    fn check_clock(&mut self) {
        if let Some(limit) = self.hard_limit
            && self.start.elapsed() >= limit
        {
            self.aborted = true;
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

// Mate scores are stored in the TT relative to the entry's node, not the
// root, so they stay valid when probed from a different ply.
fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

struct SearchContext<'a> {
    tables: &'a AttackTables,
    tt: &'a mut TranspositionTable,
    time: TimeManager<'a>,
    nodes: u64,
    qnodes: u64,
    contempt: i32,
}

impl SearchContext<'_> {
    #[inline(always)]
    fn poll(&mut self) -> bool {
        if self.nodes.wrapping_add(self.qnodes) & 1023 == 0 {
            self.time.check_clock();
        }
        self.time.should_stop()
    }
}

/// Captures-only extension of the leaf evaluation. Terminates without a
/// depth cap because every recursion removes a piece.
fn quiesce(board: &mut Board, ctx: &mut SearchContext, mut alpha: i32, beta: i32) -> i32 {
    ctx.qnodes += 1;

    let stand_pat = evaluate(board, ctx.tables, ctx.contempt);
    if stand_pat >= beta {
        return beta;
    }
    alpha = alpha.max(stand_pat);

    let mut moves = MoveList::new();
    let mut scratch = MoveList::new();
    generate_captures(board, ctx.tables, &mut moves, &mut scratch);
    order_moves(&mut moves, None);

    for i in 0..moves.len() {
        if ctx.poll() {
            return stand_pat;
        }

        let mv = moves[i];
        let undo = make_move(board, mv);
        let score = -quiesce(board, ctx, -beta, -alpha);
        unmake_move(board, undo);

        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }

    alpha
}

fn negamax(
    board: &mut Board,
    ctx: &mut SearchContext,
    depth: i32,
    ply: i32,
    mut alpha: i32,
    mut beta: i32,
) -> (i32, Option<Move>) {
    ctx.nodes += 1;
    if ctx.poll() {
        return (0, None);
    }

    if depth <= 0 {
        return (quiesce(board, ctx, alpha, beta), None);
    }

    // A position already visited since the last irreversible move is a
    // draw by repetition as far as the search is concerned.
    if ply > 0 && board.is_repetition() {
        return (ctx.contempt, None);
    }

    let hash = board.zobrist;
    let mut hash_move = None;
    if let Some(entry) = ctx.tt.probe(hash) {
        hash_move = entry.best_move;
        if entry.depth as i32 >= depth && ply > 0 {
            let score = score_from_tt(entry.score, ply);
            match entry.bound {
                NodeType::Exact => return (score, entry.best_move),
                NodeType::LowerBound => alpha = alpha.max(score),
                NodeType::UpperBound => beta = beta.min(score),
            }
            if alpha >= beta {
                return (score, entry.best_move);
            }
        }
    }

    let mut moves = MoveList::new();
    let mut scratch = MoveList::new();
    generate_legal(board, ctx.tables, &mut moves, &mut scratch);

    if moves.is_empty() {
        if in_check(board, board.side_to_move, ctx.tables) {
            // Mated here; the ply term makes nearer mates score worse for
            // the mated side, so the winner prefers the short path.
            return (-MATE_SCORE + ply, None);
        }
        return (0, None);
    }

    order_moves(&mut moves, hash_move);

    let mut best_move = None;
    for i in 0..moves.len() {
        let mv = moves[i];
        let undo = make_move(board, mv);
        let (value, _) = negamax(board, ctx, depth - 1, ply + 1, -beta, -alpha);
        let score = -value;
        unmake_move(board, undo);

        if ctx.time.should_stop() {
            return (0, None);
        }

        if score >= beta {
            // The opponent would not allow this position; what we found is
            // a lower bound.
            ctx.tt.save(
                hash,
                Some(mv),
                score_to_tt(beta, ply),
                depth as u8,
                NodeType::LowerBound,
            );
            return (beta, Some(mv));
        }
        if score > alpha {
            alpha = score;
            best_move = Some(mv);
        }
    }

    // If no move raised alpha, all we learned is an upper bound.
    let bound = if best_move.is_some() {
        NodeType::Exact
    } else {
        NodeType::UpperBound
    };
    ctx.tt.save(hash, best_move, score_to_tt(alpha, ply), depth as u8, bound);

    (alpha, best_move)
}

fn format_score(score: i32) -> String {
    if score.abs() >= MATE_THRESHOLD {
        let plies = MATE_SCORE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {}", moves)
        } else {
            format!("mate -{}", moves)
        }
    } else {
        format!("cp {}", score)
    }
}

/// Iterative deepening driver. `board` is the caller's value copy and is
/// left in its starting state between iterations (make and unmake pair up
/// inside). Emits one UCI `info` line per completed iteration.
pub fn search(
    board: &mut Board,
    tables: &AttackTables,
    tt: &mut TranspositionTable,
    params: SearchParams,
    stop: &AtomicBool,
) -> SearchReport {
    let mut ctx = SearchContext {
        tables,
        tt,
        time: TimeManager::new(params.hard_limit, stop),
        nodes: 0,
        qnodes: 0,
        contempt: params.contempt,
    };

    // Fall back to the first legal move so a stop before the first
    // completed iteration still yields something playable.
    let mut legal = MoveList::new();
    let mut scratch = MoveList::new();
    generate_legal(board, ctx.tables, &mut legal, &mut scratch);
    order_moves(&mut legal, None);

    let mut report = SearchReport {
        best_move: legal.first().copied(),
        score: 0,
        depth: 0,
        nodes: 0,
        qnodes: 0,
    };
    if legal.is_empty() {
        return report;
    }

    for depth in 2..=params.max_depth {
        let (score, best_move) = negamax(board, &mut ctx, depth, 0, -INF, INF);

        // An aborted iteration searched only part of the move list; its
        // result is not trustworthy.
        if ctx.time.should_stop() {
            break;
        }

        if let Some(mv) = best_move {
            report.best_move = Some(mv);
            report.score = score;
            report.depth = depth;

            println!(
                "info depth {} score {} nodes {} time {} pv {}",
                depth,
                format_score(score),
                ctx.nodes + ctx.qnodes,
                ctx.time.elapsed().as_millis(),
                mv.to_uci()
            );
            let _ = std::io::Write::flush(&mut std::io::stdout());
        }

        // A found mate does not improve with depth.
        if score.abs() >= MATE_THRESHOLD {
            break;
        }

        if ctx.time.elapsed() >= params.soft_limit {
            break;
        }
    }

    report.nodes = ctx.nodes;
    report.qnodes = ctx.qnodes;
    report
}

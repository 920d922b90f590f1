use meneldor::board::Board;
use meneldor::moves::attacks::attack_tables;
use meneldor::search::search::{MATE_THRESHOLD, SearchParams, SearchReport, search};
use meneldor::search::tt::TranspositionTable;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn run_search(fen: &str, depth: i32) -> SearchReport {
    let mut board = Board::from_str(fen).unwrap();
    let mut tt = TranspositionTable::new(16);
    let stop = AtomicBool::new(false);
    let params = SearchParams {
        max_depth: depth,
        soft_limit: Duration::from_secs(600),
        hard_limit: None,
        contempt: 0,
    };
    search(&mut board, attack_tables(), &mut tt, params, &stop)
}

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn returns_a_move_from_the_start_position() {
    let report = run_search(START_FEN, 4);
    let mv = report.best_move.expect("a best move");
    // Sanity: a white move from rank 1 or 2.
    assert!(mv.from.rank() <= 1);
    assert!(report.score.abs() < 500, "startpos score {}", report.score);
    assert!(report.nodes > 0 && report.qnodes > 0);
}

/// With a fixed evaluator and zobrist table, the same search twice gives
/// the same move and score.
#[test]
fn search_is_deterministic() {
    let a = run_search(START_FEN, 4);
    let b = run_search(START_FEN, 4);
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn finds_a_back_rank_mate_in_one() {
    let report = run_search("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1", 4);
    assert_eq!(report.best_move.expect("mate move").to_uci(), "d1d8");
    assert!(
        report.score >= MATE_THRESHOLD,
        "expected a mate score, got {}",
        report.score
    );
}

#[test]
fn finds_a_mate_in_two() {
    // Two-rook ladder: 1.Rf7 Kb8 (forced) 2.Rg8#.
    let report = run_search("k7/8/8/8/8/8/6R1/5RK1 w - - 0 1", 6);
    assert!(
        report.score >= MATE_THRESHOLD,
        "expected a mate score, got {}",
        report.score
    );
}

#[test]
fn grabs_a_hanging_queen() {
    let report = run_search("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1", 4);
    assert_eq!(report.best_move.expect("capture").to_uci(), "d2d5");
    assert!(report.score > 800, "queen up should dominate, got {}", report.score);
}

#[test]
fn no_legal_moves_returns_no_move() {
    // Stalemate: the side to move has nothing.
    let report = run_search("k7/2Q5/8/8/8/8/8/4K3 b - - 0 1", 4);
    assert!(report.best_move.is_none());
}

#[test]
fn pre_set_stop_flag_still_yields_a_playable_move() {
    let mut board = Board::from_str(START_FEN).unwrap();
    let mut tt = TranspositionTable::new(16);
    let stop = AtomicBool::new(true);
    let report = search(
        &mut board,
        attack_tables(),
        &mut tt,
        SearchParams::default(),
        &stop,
    );
    // No iteration completed, so the fallback first legal move is used.
    assert!(report.best_move.is_some());
    assert_eq!(report.depth, 0);
}

#[test]
fn deeper_search_does_not_lose_the_mate() {
    // The mate-in-one must survive iterative deepening past depth 2.
    let report = run_search("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1", 6);
    assert_eq!(report.best_move.expect("mate move").to_uci(), "d1d8");
}

#[test]
fn warm_transposition_table_is_reusable() {
    // Two consecutive searches sharing one table (as between UCI `go`
    // commands) agree with a cold-table search.
    let mut board = Board::from_str(START_FEN).unwrap();
    let mut tt = TranspositionTable::new(16);
    let stop = AtomicBool::new(false);
    let params = SearchParams {
        max_depth: 4,
        soft_limit: Duration::from_secs(600),
        hard_limit: None,
        contempt: 0,
    };

    let cold = search(&mut board.clone(), attack_tables(), &mut tt, params, &stop);
    let warm = search(&mut board, attack_tables(), &mut tt, params, &stop);
    assert_eq!(cold.best_move, warm.best_move);
}

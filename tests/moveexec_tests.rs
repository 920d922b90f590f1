use meneldor::board::{Board, Color, Piece};
use meneldor::moves::attacks::attack_tables;
use meneldor::moves::execute::{generate_legal, make_move, unmake_move};
use meneldor::moves::notation::parse_uci_move;
use meneldor::moves::types::Move;
use meneldor::square::Square;
use std::str::FromStr;

fn legal_moves(board: &mut Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let mut scratch = Vec::with_capacity(256);
    generate_legal(board, attack_tables(), &mut moves, &mut scratch);
    moves
}

fn uci(board: &mut Board, s: &str) -> Move {
    parse_uci_move(board, attack_tables(), s).expect("legal UCI move")
}

/// Full-state round trip: every field including clocks, rights, ep square
/// and hash must come back.
fn assert_roundtrip(fen: &str) {
    let mut board = Board::from_str(fen).expect("valid FEN");
    let before = board.clone();
    for mv in legal_moves(&mut board) {
        let undo = make_move(&mut board, mv);
        unmake_move(&mut board, undo);
        assert_eq!(board, before, "round trip failed for {mv} from {fen}");
    }
}

#[test]
fn roundtrip_startpos() {
    assert_roundtrip("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
}

#[test]
fn roundtrip_kiwipete() {
    assert_roundtrip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
}

#[test]
fn roundtrip_en_passant_and_promotion() {
    assert_roundtrip("4k3/P6P/8/3pP3/8/8/8/4K3 w - d6 0 1");
    assert_roundtrip("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
}

#[test]
fn quiet_move_advances_clocks() {
    let mut board = Board::new();
    let mv = uci(&mut board, "g1f3");
    make_move(&mut board, mv);

    assert_eq!(board.side_to_move, Color::Black);
    assert_eq!(board.halfmove_clock, 1);
    assert_eq!(board.fullmove_number, 1);
    assert_eq!(board.piece_at(Square::from_str("f3").unwrap()), Some((Color::White, Piece::Knight)));
    assert_eq!(board.piece_at(Square::from_str("g1").unwrap()), None);
}

#[test]
fn pawn_move_resets_halfmove_clock() {
    let mut board = Board::new();
    let mv = uci(&mut board, "g1f3");
    make_move(&mut board, mv);
    assert_eq!(board.halfmove_clock, 1);

    let mv = uci(&mut board, "e7e5");
    make_move(&mut board, mv);
    assert_eq!(board.halfmove_clock, 0);
    // Black moved, so the fullmove number ticks.
    assert_eq!(board.fullmove_number, 2);
}

#[test]
fn capture_resets_halfmove_clock_and_removes_victim() {
    let mut board =
        Board::from_str("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 5 3").unwrap();
    let mv = uci(&mut board, "e4d5");
    assert_eq!(mv.victim, Some(Piece::Pawn));
    make_move(&mut board, mv);

    assert_eq!(board.halfmove_clock, 0);
    assert_eq!(board.pieces(Piece::Pawn, Color::Black).count_ones(), 7);
    assert_eq!(board.piece_at(Square::from_str("d5").unwrap()), Some((Color::White, Piece::Pawn)));
}

#[test]
fn double_push_sets_en_passant_target() {
    let mut board = Board::new();
    let mv = uci(&mut board, "e2e4");
    make_move(&mut board, mv);
    assert_eq!(board.en_passant, Some(Square::from_str("e3").unwrap()));

    // Any reply that is not an immediate capture clears it.
    let mv = uci(&mut board, "g8f6");
    make_move(&mut board, mv);
    assert_eq!(board.en_passant, None);
}

#[test]
fn en_passant_capture_removes_the_bypassing_pawn() {
    let mut board = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let mv = uci(&mut board, "e5d6");
    assert!(mv.is_en_passant());
    make_move(&mut board, mv);

    assert_eq!(board.piece_at(Square::from_str("d6").unwrap()), Some((Color::White, Piece::Pawn)));
    // The victim stood on d5, not on the target square.
    assert_eq!(board.piece_at(Square::from_str("d5").unwrap()), None);
    assert_eq!(board.pieces(Piece::Pawn, Color::Black).count_ones(), 0);
}

#[test]
fn kingside_castle_moves_both_king_and_rook() {
    let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = uci(&mut board, "e1g1");
    assert!(mv.is_kingside_castle());
    make_move(&mut board, mv);

    assert_eq!(board.piece_at(Square::from_str("g1").unwrap()), Some((Color::White, Piece::King)));
    assert_eq!(board.piece_at(Square::from_str("f1").unwrap()), Some((Color::White, Piece::Rook)));
    assert_eq!(board.piece_at(Square::from_str("h1").unwrap()), None);
    assert_eq!(board.piece_at(Square::from_str("e1").unwrap()), None);
    // Both white rights gone, black's intact.
    assert!(!board.has_kingside_castle(Color::White));
    assert!(!board.has_queenside_castle(Color::White));
    assert!(board.has_kingside_castle(Color::Black));
}

#[test]
fn rook_move_clears_only_its_right() {
    let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = uci(&mut board, "a1b1");
    make_move(&mut board, mv);

    assert!(!board.has_queenside_castle(Color::White));
    assert!(board.has_kingside_castle(Color::White));
}

#[test]
fn capturing_a_corner_rook_clears_the_opponents_right() {
    // Bishop takes the h1 rook along the long diagonal.
    let mut board = Board::from_str("r3k2r/8/8/8/4b3/8/8/R3K2R b KQkq - 0 1").unwrap();
    let mv = uci(&mut board, "e4h1");
    assert_eq!(mv.victim, Some(Piece::Rook));
    make_move(&mut board, mv);

    assert!(!board.has_kingside_castle(Color::White));
    assert!(board.has_queenside_castle(Color::White));
    assert!(board.has_kingside_castle(Color::Black));
}

#[test]
fn promotion_replaces_the_pawn_with_the_chosen_kind() {
    for (uci_str, kind) in [
        ("a7a8q", Piece::Queen),
        ("a7a8r", Piece::Rook),
        ("a7a8b", Piece::Bishop),
        ("a7a8n", Piece::Knight),
    ] {
        let mut board = Board::from_str("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = uci(&mut board, uci_str);
        make_move(&mut board, mv);

        assert_eq!(
            board.piece_at(Square::from_str("a8").unwrap()),
            Some((Color::White, kind))
        );
        assert_eq!(board.pieces(Piece::Pawn, Color::White), 0);
    }
}

#[test]
fn bitboards_stay_disjoint_through_deep_play() {
    let mut board =
        Board::from_str("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    for mv in legal_moves(&mut board) {
        let undo = make_move(&mut board, mv);
        board.validate().expect("invariants after make");
        for reply in legal_moves(&mut board) {
            let undo2 = make_move(&mut board, reply);
            board.validate().expect("invariants after reply");
            unmake_move(&mut board, undo2);
        }
        unmake_move(&mut board, undo);
        board.validate().expect("invariants after unmake");
    }
}

#[test]
fn irreversible_moves_truncate_repetition_history() {
    let mut board = Board::new();
    let t = attack_tables();
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        assert!(meneldor::moves::notation::try_move_uci(&mut board, t, mv));
    }
    // Back at the start position for the second time.
    assert!(board.is_repetition());
    assert_eq!(board.repetition_count(), 2);

    // A pawn move wipes the reversible window.
    assert!(meneldor::moves::notation::try_move_uci(&mut board, t, "e2e4"));
    assert_eq!(board.history.len(), 1);
    assert!(!board.is_repetition());
}

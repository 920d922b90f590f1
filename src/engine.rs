//! Engine state shared between the UCI loop and the search worker.
//!
//! The board is owned by the UCI thread; each `go` hands the worker a value
//! copy. The transposition table is shared behind a mutex (searches run one
//! at a time, so the lock is uncontended) and survives between searches
//! until `ucinewgame`. The stop and is-searching flags are plain relaxed
//! atomics, the only cross-thread signals in the engine.

use crate::board::error::FenError;
use crate::board::Board;
use crate::moves::attacks::attack_tables;
use crate::moves::notation::try_move_uci;
use crate::moves::perft::perft;
use crate::search::search::{SearchParams, search};
use crate::search::tt::TranspositionTable;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

pub const ENGINE_NAME: &str = "Meneldor";
pub const ENGINE_AUTHOR: &str = "Jeremy Sigrist";

const TT_SIZE_MB: usize = 64;

pub struct Engine {
    pub board: Board,
    tt: Arc<Mutex<TranspositionTable>>,
    stop_requested: Arc<AtomicBool>,
    is_searching: Arc<AtomicBool>,
    pub contempt: i32,
    pub debug: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            tt: Arc::new(Mutex::new(TranspositionTable::new(TT_SIZE_MB))),
            stop_requested: Arc::new(AtomicBool::new(false)),
            is_searching: Arc::new(AtomicBool::new(false)),
            contempt: 0,
            debug: false,
        }
    }

    /// Reset for a fresh game: starting position, cold table.
    pub fn new_game(&mut self) {
        self.board = Board::new();
        self.tt.lock().unwrap().clear();
    }

    pub fn set_startpos(&mut self) {
        self.board = Board::new();
    }

    pub fn set_position(&mut self, fen: &str) -> Result<(), FenError> {
        self.board.set_fen(fen)
    }

    /// Apply one UCI move to the owned board. The repetition history the
    /// search consults is maintained by `make_move` itself.
    pub fn make_uci_move(&mut self, mv: &str) -> bool {
        try_move_uci(&mut self.board, attack_tables(), mv)
    }

    /// Launch the search on a worker thread and return its handle. The
    /// worker owns a copy of the board, prints the `info` lines as it
    /// deepens and always emits exactly one `bestmove` line.
    pub fn go(&mut self, params: SearchParams) -> JoinHandle<()> {
        self.stop_requested.store(false, Ordering::Relaxed);
        self.is_searching.store(true, Ordering::Relaxed);

        let mut board = self.board.clone();
        let tt = Arc::clone(&self.tt);
        let stop = Arc::clone(&self.stop_requested);
        let searching = Arc::clone(&self.is_searching);

        std::thread::spawn(move || {
            use std::io::Write;

            let tables = attack_tables();
            let report = {
                let mut tt = tt.lock().unwrap();
                search(&mut board, tables, &mut *tt, params, &stop)
            };

            match report.best_move {
                Some(mv) => println!("bestmove {}", mv.to_uci()),
                None => println!("bestmove 0000"),
            }
            let _ = std::io::stdout().flush();

            searching.store(false, Ordering::Relaxed);
        })
    }

    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::Relaxed);
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching.load(Ordering::Relaxed)
    }

    pub fn default_params(&self) -> SearchParams {
        SearchParams {
            contempt: self.contempt,
            ..SearchParams::default()
        }
    }

    pub fn perft(&mut self, depth: u32) -> u64 {
        perft(&mut self.board, attack_tables(), depth)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

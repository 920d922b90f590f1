//! Line-oriented UCI adapter: blocking reads on stdin, responses on
//! stdout, diagnostics on stderr. The loop stays responsive while a search
//! runs because `go` only spawns the worker; `stop`/`quit` flip the stop
//! flag and join it. Unrecognised commands are ignored, per UCI custom.

use crate::engine::{ENGINE_AUTHOR, ENGINE_NAME, Engine};
use crate::search::search::SearchParams;
use std::io::{self, BufRead, Write};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

pub fn run_uci_loop(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut search_thread: Option<JoinHandle<()>> = None;

    for line in stdin.lock().lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                println!("id name {}", ENGINE_NAME);
                println!("id author {}", ENGINE_AUTHOR);
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => {
                finish_search(engine, &mut search_thread);
                engine.new_game();
            }
            "position" => {
                finish_search(engine, &mut search_thread);
                handle_position(engine, &parts);
            }
            "go" => {
                finish_search(engine, &mut search_thread);
                let params = parse_go_params(&parts, engine.default_params());
                search_thread = Some(engine.go(params));
            }
            "stop" => finish_search(engine, &mut search_thread),
            "setoption" => {
                // No options are advertised; recognised but a no-op.
                debug!(command = %line, "setoption ignored");
            }
            "debug" => {
                engine.debug = parts.get(1) == Some(&"on");
            }
            // Convenience commands, not part of UCI: print the position,
            // count leaf nodes.
            "fen" | "d" => println!("{}", engine.board),
            "perft" => {
                finish_search(engine, &mut search_thread);
                if let Some(depth) = parts.get(1).and_then(|s| s.parse::<u32>().ok()) {
                    let start = std::time::Instant::now();
                    let nodes = engine.perft(depth);
                    println!(
                        "perft {} nodes in {:.3} seconds",
                        nodes,
                        start.elapsed().as_secs_f64()
                    );
                }
            }
            "quit" => {
                finish_search(engine, &mut search_thread);
                break;
            }
            other => {
                if engine.debug {
                    eprintln!("info string unknown command: {}", other);
                }
                debug!(command = other, "unknown command ignored");
            }
        }

        stdout.flush()?;
    }

    Ok(())
}

/// Signal the worker (if any) to stop and wait for its `bestmove`.
fn finish_search(engine: &Engine, search_thread: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = search_thread.take() {
        engine.stop();
        let _ = handle.join();
    }
}

/// `position startpos [moves …]` | `position fen <6 fields> [moves …]`.
///
/// A malformed FEN leaves the previous position in place after a stderr
/// diagnostic; a malformed move aborts the move list the same way.
fn handle_position(engine: &mut Engine, parts: &[&str]) {
    let moves_idx = parts.iter().position(|&p| p == "moves");

    match parts.get(1) {
        Some(&"startpos") => engine.set_startpos(),
        Some(&"fen") => {
            let fen_end = moves_idx.unwrap_or(parts.len());
            let fen = parts[2..fen_end].join(" ");
            if let Err(err) = engine.set_position(&fen) {
                eprintln!("info string bad fen: {}", err);
                return;
            }
        }
        _ => {
            eprintln!("info string position needs 'startpos' or 'fen'");
            return;
        }
    }

    if let Some(idx) = moves_idx {
        for mv in &parts[idx + 1..] {
            if !engine.make_uci_move(mv) {
                eprintln!("info string illegal move: {}", mv);
                return;
            }
        }
    }
}

/// Pick the search limits out of a `go` command. `depth` lifts the soft
/// time cap (the caller asked for that depth), `movetime` is a hard wall;
/// the clock fields are accepted and ignored — time allocation beyond the
/// fixed soft cap is out of scope.
fn parse_go_params(parts: &[&str], defaults: SearchParams) -> SearchParams {
    let mut params = defaults;

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                if let Some(d) = parts.get(i + 1).and_then(|s| s.parse::<i32>().ok()) {
                    params.max_depth = d.max(2);
                    params.soft_limit = Duration::from_secs(60 * 60 * 24);
                }
                i += 2;
            }
            "movetime" => {
                if let Some(ms) = parts.get(i + 1).and_then(|s| s.parse::<u64>().ok()) {
                    let limit = Duration::from_millis(ms);
                    params.hard_limit = Some(limit);
                    params.soft_limit = limit;
                }
                i += 2;
            }
            "wtime" | "btime" | "winc" | "binc" | "movestogo" | "nodes" | "mate" => i += 2,
            _ => i += 1,
        }
    }

    params
}

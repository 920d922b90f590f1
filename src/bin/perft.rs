use meneldor::board::Board;
use meneldor::logger::init_logging;
use meneldor::moves::attacks::attack_tables;
use meneldor::moves::perft::{perft, perft_divide};
use std::str::FromStr;
use std::time::Instant;

fn usage() -> ! {
    eprintln!("usage: perft <fen> <depth> [divide]");
    std::process::exit(2);
}

fn main() {
    init_logging("logs/perft.log", "info");

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let divide = args.last().map(String::as_str) == Some("divide");
    if divide {
        args.pop();
    }

    // The FEN may arrive unquoted; everything before the depth is position.
    let Some(depth_str) = args.pop() else { usage() };
    let Ok(depth) = depth_str.parse::<u32>() else { usage() };
    if args.is_empty() {
        usage();
    }
    let fen = args.join(" ");

    let mut board = match Board::from_str(&fen) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("bad fen: {}", err);
            std::process::exit(2);
        }
    };

    let tables = attack_tables();
    let start = Instant::now();
    let nodes = if divide {
        perft_divide(&mut board, tables, depth)
    } else {
        perft(&mut board, tables, depth)
    };
    let elapsed = start.elapsed().as_secs_f64();

    println!("{} nodes in {:.3} seconds", nodes, elapsed);
}

use meneldor::engine::Engine;
use meneldor::logger::init_logging;
use meneldor::uci::run_uci_loop;

fn main() {
    init_logging("logs/meneldor.log", "info");

    let mut engine = Engine::new();
    if let Err(err) = run_uci_loop(&mut engine) {
        eprintln!("info string fatal I/O error: {}", err);
        std::process::exit(1);
    }
}

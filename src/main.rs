use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use typestash::cli::{self, Cli};
use typestash::mover::RunCounters;
use typestash::output::Reporter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let counters = Arc::new(RunCounters::new());

    // Ctrl+C reports the counters gathered so far and terminates.
    let handler_counters = Arc::clone(&counters);
    if let Err(err) = ctrlc::set_handler(move || {
        eprintln!(
            "\nInterrupted: {} moved, {} remaining of {}",
            handler_counters.moved(),
            handler_counters.remaining(),
            handler_counters.total()
        );
        std::process::exit(130); // Standard exit code for SIGINT
    }) {
        eprintln!("Failed to set Ctrl+C handler: {}", err);
        return ExitCode::FAILURE;
    }

    let reporter = Reporter::new(cli.verbose);
    match cli::run(&cli, &reporter, &counters) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            reporter.error(&message);
            ExitCode::FAILURE
        }
    }
}

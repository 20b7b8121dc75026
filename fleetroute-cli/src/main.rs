//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use fleetroute_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = fleetroute_cli::run() {
        if let CliError::ArgumentParsing(clap_err) = &err {
            clap_err.exit();
        }
        eprintln!("fleetroute: {err}");
        std::process::exit(1);
    }
}

/// Send `log` and `tracing` records to stderr, filtered by `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Fails only when a global subscriber already exists.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

//! Command-line interface for the fleetroute engine.
//!
//! `fleetroute solve` reads the fleet from SQLite, prices every arc through
//! OSRM and prints one route per vehicle. `fleetroute import` loads a JSON
//! fleet snapshot into the SQLite tables the solver reads.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod import;
mod solve;

pub use error::CliError;

use import::{ImportArgs, run_import};
use solve::{SolveArgs, run_solve};

const ARG_DATABASE: &str = "database";
const ARG_SNAPSHOT: &str = "snapshot";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_PROFILE: &str = "profile";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_MAX_IN_FLIGHT: &str = "max-in-flight";
const ARG_MAX_ATTEMPTS: &str = "max-attempts";
const ARG_DEADLINE_SECS: &str = "deadline-secs";
const ARG_IMPROVE: &str = "improve";
const ARG_FORMAT: &str = "format";
const ENV_IMPORT_SNAPSHOT: &str = "FLEETROUTE_CMDS_IMPORT_SNAPSHOT";

/// Default SQLite database used by both subcommands.
const DEFAULT_DATABASE: &str = "fleet.db";

/// Run the fleetroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, or the
/// selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Solve(args) => run_solve(args, &mut stdout),
        Command::Import(args) => run_import(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fleetroute",
    about = "Capacitated vehicle routing over a SQLite fleet and an OSRM server",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assign every customer to a vehicle route.
    Solve(SolveArgs),
    /// Load a JSON fleet snapshot into the SQLite database.
    Import(ImportArgs),
}

#[cfg(test)]
mod tests;

//! Solve command implementation for the fleetroute CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use fleetroute_core::{SolveResponse, Solver, SqliteFleetStore};
use fleetroute_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
use fleetroute_solver::{CheapestArcSolver, Improvement, SolverConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_DEADLINE_SECS, ARG_FORMAT, ARG_IMPROVE, ARG_MAX_ATTEMPTS, ARG_MAX_IN_FLIGHT,
    ARG_OSRM_BASE_URL, ARG_PROFILE, ARG_TIMEOUT_SECS, CliError, DEFAULT_DATABASE, fs,
};

/// Shape of the solve output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// `{"<vehicle index>": [customer id, ...]}`.
    #[default]
    Positional,
    /// The full solve response with vehicle ids, loads, distances and
    /// diagnostics.
    Detailed,
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve the capacitated routing problem stored in the fleet \
                 database. The lowest customer id is the depot. Every arc is \
                 priced through an OSRM server before construction starts.",
    about = "Assign every customer to a vehicle route"
)]
#[ortho_config(prefix = "FLEETROUTE")]
pub(crate) struct SolveArgs {
    /// Path to the SQLite fleet database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Timeout for each route query, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Maximum number of route queries in flight.
    #[arg(long = ARG_MAX_IN_FLIGHT, value_name = "count")]
    #[serde(default)]
    pub(crate) max_in_flight: Option<usize>,
    /// Attempts per route query when the server fails transiently.
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Bound on fetching the whole distance matrix, in seconds.
    #[arg(long = ARG_DEADLINE_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) deadline_secs: Option<u64>,
    /// Run 2-opt and relocate after construction.
    #[arg(long = ARG_IMPROVE, num_args = 0..=1, default_missing_value = "true", value_name = "bool")]
    #[serde(default)]
    pub(crate) improve: Option<bool>,
    /// Output shape.
    #[arg(long = ARG_FORMAT, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) profile: String,
    pub(crate) timeout: Duration,
    pub(crate) max_in_flight: usize,
    pub(crate) max_attempts: u32,
    pub(crate) deadline: Option<Duration>,
    pub(crate) improve: bool,
    pub(crate) format: OutputFormat,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }

    pub(crate) fn provider_config(&self) -> HttpDistanceProviderConfig {
        let config = HttpDistanceProviderConfig::new(self.osrm_base_url.clone())
            .with_profile(self.profile.clone())
            .with_timeout(self.timeout)
            .with_max_in_flight(self.max_in_flight)
            .with_max_attempts(self.max_attempts);
        match self.deadline {
            Some(deadline) => config.with_deadline(deadline),
            None => config,
        }
    }

    pub(crate) fn solver_config(&self) -> SolverConfig {
        let improvement = if self.improve {
            Improvement::all()
        } else {
            Improvement::default()
        };
        SolverConfig::default().with_improvement(improvement)
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let defaults = HttpDistanceProviderConfig::default();
        let timeout = match args.timeout_secs {
            Some(secs) => Duration::from_secs(positive(secs, ARG_TIMEOUT_SECS)?),
            None => defaults.timeout,
        };
        let max_in_flight = args
            .max_in_flight
            .map(|count| positive(count, ARG_MAX_IN_FLIGHT))
            .transpose()?
            .unwrap_or(defaults.max_in_flight);
        let max_attempts = args
            .max_attempts
            .map(|count| positive(count, ARG_MAX_ATTEMPTS))
            .transpose()?
            .unwrap_or(defaults.max_attempts);
        let deadline = args
            .deadline_secs
            .map(|secs| positive(secs, ARG_DEADLINE_SECS).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            osrm_base_url: args.osrm_base_url.unwrap_or(defaults.base_url),
            profile: args.profile.unwrap_or(defaults.profile),
            timeout,
            max_in_flight,
            max_attempts,
            deadline,
            improve: args.improve.unwrap_or(false),
            format: args.format.unwrap_or_default(),
        })
    }
}

fn positive<T>(value: T, field: &'static str) -> Result<T, CliError>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        Err(CliError::ZeroValue { field })
    } else {
        Ok(value)
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builds a solver instance for the current solve invocation.
pub(crate) trait SolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError>;
}

pub(crate) struct DefaultSolveSolverBuilder;

impl SolveSolverBuilder for DefaultSolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
        let store = SqliteFleetStore::open(config.database.as_std_path())?;
        let provider =
            HttpDistanceProvider::with_config(config.provider_config()).map_err(|source| {
                CliError::BuildDistanceProvider {
                    base_url: config.osrm_base_url.clone(),
                    source,
                }
            })?;
        Ok(Box::new(CheapestArcSolver::with_config(
            store,
            provider,
            config.solver_config(),
        )))
    }
}

pub(crate) fn run_solve(args: SolveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    run_solve_with(args, &DefaultSolveSolverBuilder, writer)
}

pub(crate) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let solver = builder.build(&config)?;
    let response = solver.solve()?;
    log::info!(
        "routed {} customers over {} m (matrix {:?}, total {:?})",
        response.diagnostics.customers_routed,
        response.diagnostics.total_distance,
        response.diagnostics.matrix_time,
        response.diagnostics.solve_time
    );
    write_solve_output(writer, &response, config.format)
}

pub(crate) fn write_solve_output(
    writer: &mut dyn Write,
    response: &SolveResponse,
    format: OutputFormat,
) -> Result<(), CliError> {
    let payload = match format {
        OutputFormat::Positional => {
            serde_json::to_string_pretty(&response.solution.by_vehicle_index())
        }
        OutputFormat::Detailed => serde_json::to_string_pretty(response),
    }
    .map_err(CliError::SerialiseSolveOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

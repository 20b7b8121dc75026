//! Error types emitted by the fleetroute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use fleetroute_core::{SolveError, SolveErrorKind, SqliteFleetStoreError};
use fleetroute_data::PersistFleetError;
use fleetroute_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the fleetroute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A numeric option must be positive.
    #[error("--{field} must be greater than zero")]
    ZeroValue { field: &'static str },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the fleet store failed.
    #[error(transparent)]
    OpenFleetStore(#[from] SqliteFleetStoreError),
    /// Constructing the distance provider failed.
    #[error("failed to build distance provider for {base_url:?}: {source}")]
    BuildDistanceProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The solver failed. The kind is reported alongside the cause.
    #[error("solve failed ({kind}): {source}")]
    Solve {
        kind: SolveErrorKind,
        #[source]
        source: SolveError,
    },
    /// Serialising the solve output failed.
    #[error("failed to serialise solve output: {0}")]
    SerialiseSolveOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Opening the fleet snapshot failed.
    #[error("failed to open fleet snapshot at {path:?}: {source}")]
    OpenSnapshot {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Fleet snapshot JSON could not be decoded.
    #[error("failed to parse fleet snapshot JSON at {path:?}: {source}")]
    ParseSnapshot {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Writing the snapshot into SQLite failed.
    #[error("failed to import fleet into {path:?}: {source}")]
    PersistFleet {
        path: Utf8PathBuf,
        #[source]
        source: PersistFleetError,
    },
}

impl From<SolveError> for CliError {
    fn from(source: SolveError) -> Self {
        Self::Solve {
            kind: source.kind(),
            source,
        }
    }
}

//! Import command: load a JSON fleet snapshot into SQLite.

use std::io::{BufReader, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use fleetroute_data::{FleetSnapshot, persist_snapshot};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::solve::require_existing;
use crate::{ARG_DATABASE, ARG_SNAPSHOT, CliError, DEFAULT_DATABASE, ENV_IMPORT_SNAPSHOT, fs};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load customers and vehicles from a JSON snapshot into the \
                 fleet database. Existing rows with the same id are \
                 replaced, so re-importing a snapshot is safe.",
    about = "Import a fleet snapshot"
)]
#[ortho_config(prefix = "FLEETROUTE")]
pub(crate) struct ImportArgs {
    /// Path to a JSON file with `customers` and `vehicles` arrays.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) snapshot: Option<Utf8PathBuf>,
    /// Path to the SQLite fleet database; created when missing.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) snapshot: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let snapshot = args.snapshot.ok_or(CliError::MissingArgument {
            field: ARG_SNAPSHOT,
            env: ENV_IMPORT_SNAPSHOT,
        })?;
        Ok(Self {
            snapshot,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        })
    }
}

impl ImportConfig {
    fn load_snapshot(&self) -> Result<FleetSnapshot, CliError> {
        require_existing(&self.snapshot, ARG_SNAPSHOT)?;
        let file = fs::open_utf8_file(&self.snapshot).map_err(|source| CliError::OpenSnapshot {
            path: self.snapshot.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseSnapshot {
            path: self.snapshot.clone(),
            source,
        })
    }
}

pub(crate) fn run_import(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let snapshot = config.load_snapshot()?;
    persist_snapshot(config.database.as_std_path(), &snapshot).map_err(|source| {
        CliError::PersistFleet {
            path: config.database.clone(),
            source,
        }
    })?;
    log::debug!("persisted snapshot {} into {}", config.snapshot, config.database);
    writeln!(
        writer,
        "imported {} customers and {} vehicles into {}",
        snapshot.customers().len(),
        snapshot.vehicles().len(),
        config.database
    )
    .map_err(CliError::WriteOutput)
}

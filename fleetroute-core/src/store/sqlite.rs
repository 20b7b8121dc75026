//! SQLite-backed fleet store reading the `customer` and `vehicle` tables.

use std::path::{Path, PathBuf};

use geo::Coord;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use thiserror::Error;

use crate::{Customer, Vehicle};

use super::FleetStore;

const REQUIRED_TABLES: [&str; 2] = ["customer", "vehicle"];

/// DDL for the fleet tables read by [`SqliteFleetStore`].
///
/// Statements use `IF NOT EXISTS` so writers can apply the schema to an
/// existing database.
pub const FLEET_SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS customer (
    id INTEGER PRIMARY KEY,
    name TEXT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    demand INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS vehicle (
    id INTEGER PRIMARY KEY,
    capacity INTEGER NOT NULL
);";

/// Error raised when reading persisted fleet data.
#[derive(Debug, Error)]
pub enum SqliteFleetStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A required table is absent.
    #[error("table `{table}` is missing from {path:?}")]
    MissingTable {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Name of the missing table.
        table: &'static str,
    },
    /// A row carried an identifier that cannot be a fleet id.
    #[error("{table} row has invalid id {id}")]
    InvalidId {
        /// Table holding the row.
        table: &'static str,
        /// Stored identifier.
        id: i64,
    },
    /// A row carried a negative or out-of-range quantity.
    #[error("{table} {id} has invalid {column} {value}")]
    InvalidQuantity {
        /// Table holding the row.
        table: &'static str,
        /// Row identifier.
        id: u64,
        /// Column holding the quantity.
        column: &'static str,
        /// Stored value.
        value: i64,
    },
    /// Generic SQLite error when reading rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only fleet store backed by a SQLite database.
///
/// Every read opens its own read-only connection, so each snapshot reflects
/// the database as it was at the time of the call.
#[derive(Debug, Clone)]
pub struct SqliteFleetStore {
    path: PathBuf,
}

impl SqliteFleetStore {
    /// Open a store and check that the fleet tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteFleetStoreError::OpenDatabase`] when the file cannot be
    /// opened and [`SqliteFleetStoreError::MissingTable`] when either table is
    /// absent.
    pub fn open<P>(path: P) -> Result<Self, SqliteFleetStoreError>
    where
        P: AsRef<Path>,
    {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        let connection = store.connect()?;
        for table in REQUIRED_TABLES {
            let found: Option<String> = connection
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .optional()?;
            if found.is_none() {
                return Err(SqliteFleetStoreError::MissingTable {
                    path: store.path.clone(),
                    table,
                });
            }
        }
        Ok(store)
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, SqliteFleetStoreError> {
        Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |source| SqliteFleetStoreError::OpenDatabase {
                path: self.path.clone(),
                source,
            },
        )
    }
}

impl FleetStore for SqliteFleetStore {
    type Error = SqliteFleetStoreError;

    fn customers(&self) -> Result<Vec<Customer>, Self::Error> {
        let connection = self.connect()?;
        let mut statement = connection
            .prepare("SELECT id, latitude, longitude, demand FROM customer ORDER BY id")?;
        let mut rows = statement.query([])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            let id = row_id("customer", row.get(0)?)?;
            let latitude: f64 = row.get(1)?;
            let longitude: f64 = row.get(2)?;
            let demand = quantity("customer", id, "demand", row.get(3)?)?;
            customers.push(Customer::new(
                id,
                Coord {
                    x: longitude,
                    y: latitude,
                },
                demand,
            ));
        }
        log::debug!("loaded {} customers from {}", customers.len(), self.path.display());
        Ok(customers)
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, Self::Error> {
        let connection = self.connect()?;
        let mut statement = connection.prepare("SELECT id, capacity FROM vehicle ORDER BY id")?;
        let mut rows = statement.query([])?;
        let mut vehicles = Vec::new();
        while let Some(row) = rows.next()? {
            let id = row_id("vehicle", row.get(0)?)?;
            let capacity = quantity("vehicle", id, "capacity", row.get(1)?)?;
            vehicles.push(Vehicle::new(id, capacity));
        }
        log::debug!("loaded {} vehicles from {}", vehicles.len(), self.path.display());
        Ok(vehicles)
    }
}

fn row_id(table: &'static str, id: i64) -> Result<u64, SqliteFleetStoreError> {
    u64::try_from(id).map_err(|_| SqliteFleetStoreError::InvalidId { table, id })
}

fn quantity(
    table: &'static str,
    id: u64,
    column: &'static str,
    value: i64,
) -> Result<u32, SqliteFleetStoreError> {
    u32::try_from(value).map_err(|_| SqliteFleetStoreError::InvalidQuantity {
        table,
        id,
        column,
        value,
    })
}

//! Persistence of fleet snapshots into the SQLite fleet schema.

use std::path::{Path, PathBuf};

use fleetroute_core::store::FLEET_SCHEMA;
use fleetroute_core::{Customer, Vehicle};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A customer row of a [`FleetSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer id. The lowest id is the depot.
    pub id: u64,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// WGS84 latitude in degrees.
    pub latitude: f64,
    /// WGS84 longitude in degrees.
    pub longitude: f64,
    /// Load collected at this stop.
    pub demand: u32,
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: None,
            latitude: customer.latitude(),
            longitude: customer.longitude(),
            demand: customer.demand,
        }
    }
}

impl From<&CustomerRecord> for Customer {
    fn from(record: &CustomerRecord) -> Self {
        Self::from_lat_lon(record.id, record.latitude, record.longitude, record.demand)
    }
}

/// A vehicle row of a [`FleetSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Vehicle id.
    pub id: u64,
    /// Maximum load.
    pub capacity: u32,
}

impl From<&Vehicle> for VehicleRecord {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            capacity: vehicle.capacity,
        }
    }
}

impl From<&VehicleRecord> for Vehicle {
    fn from(record: &VehicleRecord) -> Self {
        Self::new(record.id, record.capacity)
    }
}

/// JSON interchange format for importing a fleet.
///
/// # Examples
/// ```
/// use fleetroute_data::FleetSnapshot;
///
/// let snapshot: FleetSnapshot = serde_json::from_str(r#"{
///     "customers": [
///         {"id": 1, "name": "depot", "latitude": 51.5, "longitude": -0.1, "demand": 0},
///         {"id": 2, "latitude": 51.6, "longitude": -0.2, "demand": 3}
///     ],
///     "vehicles": [{"id": 1, "capacity": 10}]
/// }"#)?;
/// assert_eq!(snapshot.customers().len(), 2);
/// assert_eq!(snapshot.vehicles()[0].capacity, 10);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Customers, depot included.
    #[serde(default)]
    pub customers: Vec<CustomerRecord>,
    /// Vehicles.
    #[serde(default)]
    pub vehicles: Vec<VehicleRecord>,
}

impl FleetSnapshot {
    /// Build a snapshot from domain values. Names are left empty.
    #[must_use]
    pub fn from_fleet(customers: &[Customer], vehicles: &[Vehicle]) -> Self {
        Self {
            customers: customers.iter().map(CustomerRecord::from).collect(),
            vehicles: vehicles.iter().map(VehicleRecord::from).collect(),
        }
    }

    /// Customers as domain values.
    #[must_use]
    pub fn customers(&self) -> Vec<Customer> {
        self.customers.iter().map(Customer::from).collect()
    }

    /// Vehicles as domain values.
    #[must_use]
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.vehicles.iter().map(Vehicle::from).collect()
    }
}

/// Errors raised while writing a fleet into SQLite.
#[derive(Debug, Error)]
pub enum PersistFleetError {
    /// Opening or creating the database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Location of the database.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A statement failed.
    #[error("SQLite error during {operation}")]
    Sqlite {
        /// Step being performed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// An id does not fit SQLite's signed 64-bit integer.
    #[error("{table} id {id} exceeds SQLite's integer range")]
    IdOutOfRange {
        /// Table being written.
        table: &'static str,
        /// Offending id.
        id: u64,
    },
}

/// Write `customers` and `vehicles` into the fleet tables of the database
/// at `path`.
///
/// See [`persist_snapshot`].
///
/// # Errors
///
/// Returns [`PersistFleetError`] when the database cannot be written.
pub fn persist_fleet_to_sqlite(
    path: &Path,
    customers: &[Customer],
    vehicles: &[Vehicle],
) -> Result<(), PersistFleetError> {
    persist_snapshot(path, &FleetSnapshot::from_fleet(customers, vehicles))
}

/// Write a snapshot into the fleet tables of the database at `path`.
///
/// The database file and schema are created when missing. Rows are upserted
/// by id inside one transaction, so a failure leaves the database unchanged.
///
/// # Errors
///
/// Returns [`PersistFleetError`] when the database cannot be opened, an id
/// is out of range, or a statement fails.
///
/// # Examples
/// ```
/// use fleetroute_core::{FleetStore, SqliteFleetStore};
/// use fleetroute_data::{CustomerRecord, FleetSnapshot, VehicleRecord, persist_snapshot};
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("fleet.db");
/// let snapshot = FleetSnapshot {
///     customers: vec![CustomerRecord {
///         id: 1,
///         name: Some("depot".into()),
///         latitude: 51.5,
///         longitude: -0.1,
///         demand: 0,
///     }],
///     vehicles: vec![VehicleRecord { id: 7, capacity: 12 }],
/// };
///
/// persist_snapshot(&path, &snapshot)?;
/// let store = SqliteFleetStore::open(&path)?;
/// assert_eq!(store.vehicles()?[0].id, 7);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn persist_snapshot(path: &Path, snapshot: &FleetSnapshot) -> Result<(), PersistFleetError> {
    let mut connection = Connection::open(path).map_err(|source| PersistFleetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let transaction = connection
        .transaction()
        .map_err(|source| PersistFleetError::Sqlite {
            operation: "begin persistence transaction",
            source,
        })?;
    transaction
        .execute_batch(FLEET_SCHEMA)
        .map_err(|source| PersistFleetError::Sqlite {
            operation: "create fleet schema",
            source,
        })?;

    {
        let mut insert_customer = transaction
            .prepare_cached(
                "INSERT INTO customer (id, name, latitude, longitude, demand)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    demand = excluded.demand",
            )
            .map_err(|source| PersistFleetError::Sqlite {
                operation: "prepare insert customer",
                source,
            })?;
        for customer in &snapshot.customers {
            let id = sqlite_id("customer", customer.id)?;
            insert_customer
                .execute((
                    id,
                    customer.name.as_deref(),
                    customer.latitude,
                    customer.longitude,
                    customer.demand,
                ))
                .map_err(|source| PersistFleetError::Sqlite {
                    operation: "insert customer",
                    source,
                })?;
        }

        let mut insert_vehicle = transaction
            .prepare_cached(
                "INSERT INTO vehicle (id, capacity) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET capacity = excluded.capacity",
            )
            .map_err(|source| PersistFleetError::Sqlite {
                operation: "prepare insert vehicle",
                source,
            })?;
        for vehicle in &snapshot.vehicles {
            let id = sqlite_id("vehicle", vehicle.id)?;
            insert_vehicle
                .execute((id, vehicle.capacity))
                .map_err(|source| PersistFleetError::Sqlite {
                    operation: "insert vehicle",
                    source,
                })?;
        }
    }

    transaction
        .commit()
        .map_err(|source| PersistFleetError::Sqlite {
            operation: "commit persistence transaction",
            source,
        })?;
    log::debug!(
        "persisted {} customers and {} vehicles to {}",
        snapshot.customers.len(),
        snapshot.vehicles.len(),
        path.display()
    );
    Ok(())
}

fn sqlite_id(table: &'static str, id: u64) -> Result<i64, PersistFleetError> {
    i64::try_from(id).map_err(|_| PersistFleetError::IdOutOfRange { table, id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetroute_core::{FleetStore, SqliteFleetStore};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn sample_customers() -> Vec<Customer> {
        vec![
            Customer::from_lat_lon(1, 51.5, -0.1, 0),
            Customer::from_lat_lon(2, 51.6, -0.2, 4),
        ]
    }

    #[rstest]
    fn persisted_fleet_round_trips_through_the_store(temp_dir: TempDir) {
        let path = temp_dir.path().join("fleet.db");
        let vehicles = vec![Vehicle::new(3, 10), Vehicle::new(1, 8)];

        persist_fleet_to_sqlite(&path, &sample_customers(), &vehicles).expect("persist fleet");

        let store = SqliteFleetStore::open(&path).expect("open store");
        assert_eq!(store.customers().expect("customers"), sample_customers());
        let ids: Vec<u64> = store
            .vehicles()
            .expect("vehicles")
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[rstest]
    fn persisting_again_updates_existing_rows(temp_dir: TempDir) {
        let path = temp_dir.path().join("fleet.db");
        persist_fleet_to_sqlite(&path, &sample_customers(), &[Vehicle::new(1, 10)])
            .expect("first import");

        persist_fleet_to_sqlite(&path, &[], &[Vehicle::new(1, 25)]).expect("second import");

        let store = SqliteFleetStore::open(&path).expect("open store");
        assert_eq!(store.vehicles().expect("vehicles"), vec![Vehicle::new(1, 25)]);
        assert_eq!(store.customers().expect("customers").len(), 2);
    }

    #[rstest]
    fn names_are_stored(temp_dir: TempDir) {
        let path = temp_dir.path().join("fleet.db");
        let snapshot = FleetSnapshot {
            customers: vec![CustomerRecord {
                id: 1,
                name: Some("depot".to_owned()),
                latitude: 0.0,
                longitude: 0.0,
                demand: 0,
            }],
            vehicles: Vec::new(),
        };

        persist_snapshot(&path, &snapshot).expect("persist snapshot");

        let connection = Connection::open(&path).expect("open database");
        let name: String = connection
            .query_row("SELECT name FROM customer WHERE id = 1", [], |row| row.get(0))
            .expect("query name");
        assert_eq!(name, "depot");
    }

    #[rstest]
    fn oversized_ids_are_rejected_without_partial_writes(temp_dir: TempDir) {
        let path = temp_dir.path().join("fleet.db");
        let vehicles = vec![Vehicle::new(1, 5), Vehicle::new(u64::MAX, 5)];

        let err = persist_fleet_to_sqlite(&path, &sample_customers(), &vehicles)
            .expect_err("id does not fit");

        assert!(matches!(
            err,
            PersistFleetError::IdOutOfRange {
                table: "vehicle",
                id: u64::MAX
            }
        ));
        let connection = Connection::open(&path).expect("open database");
        let tables: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'customer'",
                [],
                |row| row.get(0),
            )
            .expect("query schema");
        assert_eq!(tables, 0, "rolled back transaction leaves no schema");
    }

    #[rstest]
    fn snapshot_json_uses_latitude_and_longitude() {
        let snapshot = FleetSnapshot::from_fleet(&sample_customers(), &[Vehicle::new(1, 10)]);

        let json = serde_json::to_value(&snapshot).expect("serialise snapshot");

        assert_eq!(json["customers"][1]["latitude"], 51.6);
        assert_eq!(json["customers"][1]["longitude"], -0.2);
        assert!(json["customers"][1].get("name").is_none());
        assert_eq!(json["vehicles"][0]["capacity"], 10);
    }
}

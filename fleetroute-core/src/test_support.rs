//! Test doubles for the store and distance boundaries, shared by unit and
//! behaviour tests across the workspace.

use std::convert::Infallible;

use geo::Coord;

use crate::{Customer, DistanceError, DistanceMatrix, DistanceProvider, FleetStore, Vehicle};

/// In-memory `FleetStore` holding fixed snapshots.
///
/// Customers and vehicles are sorted by id on construction, mirroring the
/// ordering guarantee of persistent stores.
#[derive(Default, Debug, Clone)]
pub struct MemoryFleetStore {
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
}

impl MemoryFleetStore {
    /// Create a store from the given snapshots.
    pub fn new<C, V>(customers: C, vehicles: V) -> Self
    where
        C: IntoIterator<Item = Customer>,
        V: IntoIterator<Item = Vehicle>,
    {
        let mut customers: Vec<_> = customers.into_iter().collect();
        customers.sort_by_key(|customer| customer.id);
        let mut vehicles: Vec<_> = vehicles.into_iter().collect();
        vehicles.sort_by_key(|vehicle| vehicle.id);
        Self {
            customers,
            vehicles,
        }
    }
}

impl FleetStore for MemoryFleetStore {
    type Error = Infallible;

    fn customers(&self) -> Result<Vec<Customer>, Self::Error> {
        Ok(self.customers.clone())
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>, Self::Error> {
        Ok(self.vehicles.clone())
    }
}

/// Deterministic `DistanceProvider` returning one-metre arcs.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitDistanceProvider;

impl DistanceProvider for UnitDistanceProvider {
    fn distance_matrix(&self, locations: &[Coord<f64>]) -> Result<DistanceMatrix, DistanceError> {
        if locations.is_empty() {
            return Err(DistanceError::EmptyInput);
        }
        Ok(DistanceMatrix::from_fn(locations.len(), |_, _| 1))
    }
}

/// Write customers and vehicles into a SQLite database at `path`.
///
/// The schema is created when missing and rows are upserted. Customer names
/// are derived from ids.
///
/// # Errors
///
/// Returns any error raised by `rusqlite` while writing.
#[cfg(feature = "store-sqlite")]
pub fn write_fleet_database(
    path: &std::path::Path,
    customers: &[Customer],
    vehicles: &[Vehicle],
) -> Result<(), rusqlite::Error> {
    let mut connection = rusqlite::Connection::open(path)?;
    let tx = connection.transaction()?;
    tx.execute_batch(crate::store::FLEET_SCHEMA)?;
    {
        let mut insert_customer = tx.prepare(
            "INSERT OR REPLACE INTO customer (id, name, latitude, longitude, demand) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for customer in customers {
            insert_customer.execute(rusqlite::params![
                customer.id,
                format!("customer-{}", customer.id),
                customer.latitude(),
                customer.longitude(),
                customer.demand,
            ])?;
        }
        let mut insert_vehicle =
            tx.prepare("INSERT OR REPLACE INTO vehicle (id, capacity) VALUES (?1, ?2)")?;
        for vehicle in vehicles {
            insert_vehicle.execute(rusqlite::params![vehicle.id, vehicle.capacity])?;
        }
    }
    tx.commit()
}

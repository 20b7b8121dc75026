//! Read-only access to the fleet data store.
//!
//! The [`FleetStore`] trait supplies full snapshots of customers and vehicles.
//! Solvers read both once per solve and never write back.

use crate::{Customer, Problem, SolveError, Vehicle};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{FLEET_SCHEMA, SqliteFleetStore, SqliteFleetStoreError};

/// Read-only source of customer and vehicle snapshots.
///
/// Implementations must return customers ordered by id so that the first
/// customer, the depot, is stable between calls.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use fleetroute_core::{Customer, FleetStore, Vehicle};
///
/// struct Fixed;
///
/// impl FleetStore for Fixed {
///     type Error = Infallible;
///
///     fn customers(&self) -> Result<Vec<Customer>, Self::Error> {
///         Ok(vec![Customer::from_lat_lon(1, 0.0, 0.0, 0)])
///     }
///
///     fn vehicles(&self) -> Result<Vec<Vehicle>, Self::Error> {
///         Ok(vec![Vehicle::new(1, 5)])
///     }
/// }
///
/// let problem = Fixed.load_problem().expect("fixed store never fails");
/// assert_eq!(problem.vehicles().len(), 1);
/// ```
pub trait FleetStore {
    /// Error raised when the backing store cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// All customers, ordered by id.
    fn customers(&self) -> Result<Vec<Customer>, Self::Error>;

    /// All vehicles, ordered by id.
    fn vehicles(&self) -> Result<Vec<Vehicle>, Self::Error>;

    /// Read both tables into a [`Problem`].
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Store`] wrapping the store's own error.
    fn load_problem(&self) -> Result<Problem, SolveError> {
        let customers = self.customers().map_err(SolveError::store)?;
        let vehicles = self.vehicles().map_err(SolveError::store)?;
        Ok(Problem::new(customers, vehicles))
    }
}

//! Core domain types for the fleetroute engine.
//!
//! The crate defines the vocabulary shared by every other crate in the
//! workspace: customers, vehicles and the [`Problem`] snapshot they form, the
//! [`DistanceMatrix`] produced by a [`DistanceProvider`], the [`FleetStore`]
//! boundary that supplies snapshots, and the [`Solver`] trait with its
//! [`SolveResponse`] and [`SolveError`] types.
//!
//! Coordinates follow the WGS84 convention used by `geo`: `x` is longitude
//! and `y` is latitude.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod customer;
pub mod distance;
mod problem;
mod solution;
mod solver;
pub mod store;
mod vehicle;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use customer::{Customer, CustomerId};
pub use distance::{DistanceError, DistanceMatrix, DistanceProvider};
pub use problem::{DEPOT_NODE, Problem};
pub use solution::{Solution, VehicleRoute};
pub use solver::{Diagnostics, SolveError, SolveErrorKind, SolveResponse, Solver};
pub use store::FleetStore;
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteFleetStore, SqliteFleetStoreError};
pub use vehicle::{Vehicle, VehicleId};

//! Facade crate for the fleetroute capacitated vehicle routing engine.
//!
//! This crate re-exports the core domain types and exposes the cheapest-arc
//! solver, the SQLite fleet store and the OSRM distance provider behind
//! feature flags.

#![forbid(unsafe_code)]

pub use fleetroute_core::{
    Customer, CustomerId, DEPOT_NODE, Diagnostics, DistanceError, DistanceMatrix,
    DistanceProvider, FleetStore, Problem, Solution, SolveError, SolveErrorKind, SolveResponse,
    Solver, Vehicle, VehicleId, VehicleRoute,
};

#[cfg(feature = "store-sqlite")]
pub use fleetroute_core::{SqliteFleetStore, SqliteFleetStoreError};

#[cfg(feature = "solver")]
pub use fleetroute_solver::{CheapestArcSolver, Improvement, SolverConfig, solve_problem};

#[cfg(feature = "http")]
pub use fleetroute_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};

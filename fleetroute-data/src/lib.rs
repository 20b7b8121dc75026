//! Data access adapters for the fleetroute engine.
//!
//! Responsibilities:
//! - Fetch distance matrices from an OSRM routing service.
//! - Persist fleet snapshots into the SQLite schema read by
//!   [`fleetroute_core::SqliteFleetStore`].
//!
//! Boundaries:
//! - Do not encode routing rules (live in `fleetroute-solver`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

#![forbid(unsafe_code)]

mod persist;
pub mod routing;

pub use persist::{
    CustomerRecord, FleetSnapshot, PersistFleetError, VehicleRecord, persist_fleet_to_sqlite,
    persist_snapshot,
};

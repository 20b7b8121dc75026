//! Capacitated vehicle routing engine for fleetroute.
//!
//! This crate provides [`CheapestArcSolver`], the default implementation of the
//! [`Solver`](fleetroute_core::Solver) trait. A solve reads a snapshot from a
//! [`FleetStore`](fleetroute_core::FleetStore), asks a
//! [`DistanceProvider`](fleetroute_core::DistanceProvider) for the full matrix
//! once, then runs a deterministic pipeline:
//!
//! 1. [`RoutingIndex`] fixes the mapping between customer ids and node indices,
//!    with the depot at node 0.
//! 2. [`cheapest_arc`] grows one route per vehicle by always taking the
//!    cheapest feasible arc, gated by a [`CapacityTracker`].
//! 3. [`improve`] optionally applies 2-opt and relocate moves that keep every
//!    route within capacity.
//! 4. [`extract_solution`] translates node indices back to customer ids.
//!
//! [`solve_problem`] runs the same pipeline against an in-memory problem and
//! matrix.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod capacity;
mod construction;
mod extract;
mod improve;
mod index;
mod solver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use capacity::{CapacityTracker, CapacityViolation};
pub use construction::{Construction, cheapest_arc};
pub use extract::extract_solution;
pub use improve::{Improvement, improve, route_cost};
pub use index::RoutingIndex;
pub use solver::{CheapestArcSolver, SolverConfig, solve_problem};

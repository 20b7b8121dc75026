use std::time::Duration;

use thiserror::Error;

use crate::{CustomerId, DistanceError, Solution, VehicleId};

/// Timing and summary figures for a completed solve.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Wall-clock time of the whole solve, matrix build included.
    pub solve_time: Duration,
    /// Time spent assembling the distance matrix.
    pub matrix_time: Duration,
    /// Number of customers placed on a route.
    pub customers_routed: usize,
    /// Sum of all route distances in metres.
    pub total_distance: u64,
}

/// Response from a successful solve.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResponse {
    /// Routes for every vehicle.
    pub solution: Solution,
    /// Timing and summary figures.
    pub diagnostics: Diagnostics,
}

/// Coarse classification of a [`SolveError`] for diagnostics and exit
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SolveErrorKind {
    /// The snapshot had nothing to solve.
    NoData,
    /// The routing oracle could not supply the matrix.
    OracleFetch,
    /// Demand could not be served by the fleet.
    Infeasible,
    /// The data store could not be read.
    Store,
    /// An internal invariant failed.
    Internal,
}

impl SolveErrorKind {
    /// Stable lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "no-data",
            Self::OracleFetch => "oracle-fetch",
            Self::Infeasible => "infeasible",
            Self::Store => "store",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for SolveErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Solver::solve`].
///
/// Every failure is solve-level: no partial routes accompany an error.
#[derive(Debug, Error)]
pub enum SolveError {
    /// There were no customers or no vehicles.
    #[error("nothing to solve: {customers} customers and {vehicles} vehicles")]
    NoData {
        /// Number of customers in the snapshot.
        customers: usize,
        /// Number of vehicles in the snapshot.
        vehicles: usize,
    },
    /// Two customers share an identity.
    #[error("customer id {id} appears more than once")]
    DuplicateCustomer {
        /// The repeated customer id.
        id: CustomerId,
    },
    /// A single customer cannot fit on any vehicle.
    #[error("customer {customer} with demand {demand} exceeds the largest capacity {max_capacity}")]
    Oversized {
        /// Offending customer id.
        customer: CustomerId,
        /// Its demand.
        demand: u32,
        /// Largest capacity in the fleet.
        max_capacity: u32,
    },
    /// A vehicle cannot carry the depot's own demand.
    #[error("vehicle {vehicle} with capacity {capacity} cannot carry depot {depot} demand {demand}")]
    DepotPreload {
        /// Depot customer id.
        depot: CustomerId,
        /// Demand preloaded onto every vehicle.
        demand: u32,
        /// First vehicle too small for the preload.
        vehicle: VehicleId,
        /// Its capacity.
        capacity: u32,
    },
    /// Construction stopped with customers still unassigned.
    #[error("{} customers could not be routed within capacity: {unrouted:?}", unrouted.len())]
    Infeasible {
        /// Ids of the unassigned customers.
        unrouted: Vec<CustomerId>,
    },
    /// The distance matrix could not be built.
    #[error("failed to build distance matrix: {0}")]
    Distance(#[from] DistanceError),
    /// The fleet store failed.
    #[error("failed to read fleet data: {source}")]
    Store {
        /// Underlying store error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// The matrix did not cover every node.
    #[error("distance matrix covers {found} locations, expected {expected}")]
    MatrixSizeMismatch {
        /// Number of nodes in the problem.
        expected: usize,
        /// Side length of the supplied matrix.
        found: usize,
    },
    /// An internal consistency check failed.
    #[error("internal invariant violated: {message}")]
    InvariantViolation {
        /// Description of the broken invariant.
        message: String,
    },
}

impl SolveError {
    /// Wrap a store error.
    pub fn store<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store {
            source: Box::new(source),
        }
    }

    /// Classify the error.
    ///
    /// # Examples
    /// ```
    /// use fleetroute_core::{SolveError, SolveErrorKind};
    ///
    /// let err = SolveError::Infeasible { unrouted: vec![4] };
    /// assert_eq!(err.kind(), SolveErrorKind::Infeasible);
    /// ```
    pub const fn kind(&self) -> SolveErrorKind {
        match self {
            Self::NoData { .. } => SolveErrorKind::NoData,
            Self::DuplicateCustomer { .. }
            | Self::MatrixSizeMismatch { .. }
            | Self::InvariantViolation { .. } => SolveErrorKind::Internal,
            Self::Oversized { .. } | Self::DepotPreload { .. } | Self::Infeasible { .. } => {
                SolveErrorKind::Infeasible
            }
            Self::Distance(_) => SolveErrorKind::OracleFetch,
            Self::Store { .. } => SolveErrorKind::Store,
        }
    }
}

/// Assign the fleet to the customers held by some data source.
///
/// Each call performs exactly one solve against a fresh snapshot.
/// Solvers must be `Send + Sync` to operate safely across threads.
pub trait Solver: Send + Sync {
    /// Solve the current snapshot, producing routes or an error.
    fn solve(&self) -> Result<SolveResponse, SolveError>;
}

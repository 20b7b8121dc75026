//! `CheapestArcSolver` and the in-memory solve pipeline.

use std::time::Instant;

use fleetroute_core::{
    Diagnostics, DistanceMatrix, DistanceProvider, FleetStore, Problem, SolveError, SolveResponse,
    Solution, Solver,
};

use crate::capacity::{CapacityTracker, CapacityViolation};
use crate::construction::cheapest_arc;
use crate::extract::extract_solution;
use crate::improve::{Improvement, improve};
use crate::index::RoutingIndex;

/// Configuration for [`CheapestArcSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    /// Local search applied after construction. Disabled by default.
    pub improvement: Improvement,
}

impl SolverConfig {
    /// Replace the local-search settings.
    #[must_use]
    pub const fn with_improvement(mut self, improvement: Improvement) -> Self {
        self.improvement = improvement;
        self
    }
}

/// Capacitated routing solver built on the cheapest-arc construction.
///
/// The solver is generic over the engine boundaries: a read-only fleet store
/// and a distance provider. Each [`Solver::solve`] call reads a fresh
/// snapshot and requests the matrix exactly once.
#[derive(Debug)]
pub struct CheapestArcSolver<S, D>
where
    S: FleetStore,
    D: DistanceProvider,
{
    store: S,
    provider: D,
    config: SolverConfig,
}

impl<S, D> CheapestArcSolver<S, D>
where
    S: FleetStore,
    D: DistanceProvider,
{
    /// Construct a solver using default configuration.
    pub fn new(store: S, provider: D) -> Self {
        Self::with_config(store, provider, SolverConfig::default())
    }

    /// Construct a solver with explicit configuration.
    pub const fn with_config(store: S, provider: D, config: SolverConfig) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl<S, D> Solver for CheapestArcSolver<S, D>
where
    S: FleetStore + Send + Sync,
    D: DistanceProvider + Send + Sync,
{
    fn solve(&self) -> Result<SolveResponse, SolveError> {
        let started_at = Instant::now();
        let problem = self.store.load_problem()?;
        problem.validate()?;
        log::debug!(
            "solving {} customers with {} vehicles",
            problem.node_count().saturating_sub(1),
            problem.vehicles().len()
        );

        let matrix_started_at = Instant::now();
        let matrix = self.provider.distance_matrix(&problem.locations())?;
        let matrix_time = matrix_started_at.elapsed();

        let solution = solve_problem(&problem, &matrix, &self.config)?;
        let diagnostics = Diagnostics {
            solve_time: started_at.elapsed(),
            matrix_time,
            customers_routed: solution.routed_customers(),
            total_distance: solution.total_distance(),
        };
        log::debug!(
            "routed {} customers over {} m in {:?}",
            diagnostics.customers_routed,
            diagnostics.total_distance,
            diagnostics.solve_time
        );
        Ok(SolveResponse {
            solution,
            diagnostics,
        })
    }
}

/// Solve `problem` against a prebuilt `matrix`.
///
/// This is the whole engine without I/O: validation, the routing index,
/// cheapest-arc construction, optional local search and extraction.
///
/// # Errors
///
/// - Validation failures from [`Problem::validate`].
/// - [`SolveError::MatrixSizeMismatch`] when `matrix` does not cover every
///   node.
/// - [`SolveError::Infeasible`] listing every customer construction could
///   not place.
/// - [`SolveError::InvariantViolation`] for internal defects.
///
/// # Examples
/// ```
/// use fleetroute_core::{Customer, DistanceMatrix, Problem, Vehicle};
/// use fleetroute_solver::{SolverConfig, solve_problem};
///
/// let problem = Problem::new(
///     vec![
///         Customer::from_lat_lon(1, 0.0, 0.0, 0),
///         Customer::from_lat_lon(2, 0.0, 0.0, 3),
///         Customer::from_lat_lon(3, 0.0, 0.0, 4),
///     ],
///     vec![Vehicle::new(1, 10)],
/// );
/// let matrix = DistanceMatrix::from_rows(vec![
///     vec![0, 5, 6],
///     vec![5, 0, 2],
///     vec![6, 2, 0],
/// ])?;
///
/// let solution = solve_problem(&problem, &matrix, &SolverConfig::default())?;
/// assert_eq!(solution.by_vehicle_index()[&0], vec![2, 3]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn solve_problem(
    problem: &Problem,
    matrix: &DistanceMatrix,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    problem.validate()?;
    if matrix.size() != problem.node_count() {
        return Err(SolveError::MatrixSizeMismatch {
            expected: problem.node_count(),
            found: matrix.size(),
        });
    }

    let index = RoutingIndex::new(problem.customers(), problem.vehicles().len())?;
    let capacities: Vec<u32> = problem.vehicles().iter().map(|v| v.capacity).collect();
    let mut tracker = CapacityTracker::new(&capacities, problem.depot_demand());
    let cost = |from: usize, to: usize| matrix.get(from, to).unwrap_or(u64::MAX);
    let demand = |node: usize| problem.customers().get(node).map_or(0, |c| c.demand);

    let mut built =
        cheapest_arc(index.node_count(), &mut tracker, cost, demand).map_err(invariant)?;
    if !built.is_complete() {
        let unrouted = built
            .unrouted
            .iter()
            .filter_map(|&node| index.identity_of(node))
            .collect();
        return Err(SolveError::Infeasible { unrouted });
    }

    improve(
        &mut built.routes,
        &mut tracker,
        cost,
        demand,
        &config.improvement,
    )
    .map_err(invariant)?;

    extract_solution(&index, problem.vehicles(), &built.routes, &tracker, cost)
}

fn invariant(violation: CapacityViolation) -> SolveError {
    SolveError::InvariantViolation {
        message: violation.to_string(),
    }
}

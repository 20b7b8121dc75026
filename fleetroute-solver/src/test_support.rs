//! Test-only utilities for `fleetroute-solver`.
//!
//! The helpers in this module are available to unit tests and behavioural
//! tests. They are gated behind the `test-support` feature (and `cfg(test)`).

use geo::Coord;

use fleetroute_core::{
    Customer, DistanceError, DistanceMatrix, DistanceProvider, Problem, Vehicle,
};

/// Construct a customer with `demand` on the equator, one step east per id.
///
/// # Examples
/// ```rust
/// use fleetroute_solver::test_support::customer;
///
/// let customer = customer(7, 3);
/// assert_eq!(customer.id, 7);
/// assert_eq!(customer.demand, 3);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "test helper spreads locations with a simple multiplication"
)]
pub fn customer(id: u64, demand: u32) -> Customer {
    let step = f64::from(u32::try_from(id).unwrap_or(u32::MAX));
    Customer::new(id, Coord { x: step * 0.001, y: 0.0 }, demand)
}

/// Build a problem whose depot has id 0 and zero demand, followed by one
/// customer per entry of `demands` with ids `1..`, and one vehicle per entry
/// of `capacities` with ids `1..`.
#[must_use]
pub fn problem(demands: &[u32], capacities: &[u32]) -> Problem {
    let customers = std::iter::once(customer(0, 0))
        .chain((1_u64..).zip(demands).map(|(id, &demand)| customer(id, demand)))
        .collect();
    let vehicles = (1_u64..)
        .zip(capacities)
        .map(|(id, &capacity)| Vehicle::new(id, capacity))
        .collect();
    Problem::new(customers, vehicles)
}

/// A [`DistanceProvider`] returning a fixed, pre-defined matrix.
///
/// The matrix must match the number of locations requested; a mismatch
/// produces [`DistanceError::DimensionMismatch`].
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use fleetroute_core::DistanceProvider;
/// use fleetroute_solver::test_support::FixedMatrixProvider;
///
/// let provider = FixedMatrixProvider::from_rows(vec![vec![0, 4], vec![5, 0]]);
/// let locations = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }];
/// let matrix = provider.distance_matrix(&locations).expect("2x2 matrix");
/// assert_eq!(matrix.get(1, 0), Some(5));
/// ```
#[derive(Debug, Clone)]
pub struct FixedMatrixProvider {
    rows: Vec<Vec<u64>>,
}

impl FixedMatrixProvider {
    /// Construct a provider from nested rows of metres.
    #[must_use]
    pub const fn from_rows(rows: Vec<Vec<u64>>) -> Self {
        Self { rows }
    }
}

impl DistanceProvider for FixedMatrixProvider {
    fn distance_matrix(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<DistanceMatrix, DistanceError> {
        if locations.is_empty() {
            return Err(DistanceError::EmptyInput);
        }
        if self.rows.len() != locations.len() {
            return Err(DistanceError::DimensionMismatch {
                expected: locations.len(),
                found: self.rows.len(),
            });
        }
        DistanceMatrix::from_rows(self.rows.clone())
    }
}

/// A [`DistanceProvider`] that always fails with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingDistanceProvider {
    error: DistanceError,
}

impl FailingDistanceProvider {
    /// Construct a provider that returns `error` for every request.
    #[must_use]
    pub const fn new(error: DistanceError) -> Self {
        Self { error }
    }
}

impl DistanceProvider for FailingDistanceProvider {
    fn distance_matrix(
        &self,
        _locations: &[Coord<f64>],
    ) -> Result<DistanceMatrix, DistanceError> {
        Err(self.error.clone())
    }
}

//! Distance provider trait for depot and customer locations.

use geo::Coord;

use super::error::DistanceError;
use super::matrix::DistanceMatrix;

/// Fetch pairwise travel distances for a set of locations.
///
/// Implementers must return a square `n x n` matrix where
/// `n == locations.len()`. `matrix.get(i, j)` is the distance from
/// `locations[i]` to `locations[j]`. Implementations must not assume that
/// distances are symmetric.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use fleetroute_core::{DistanceError, DistanceMatrix, DistanceProvider};
///
/// struct UnitProvider;
///
/// impl DistanceProvider for UnitProvider {
///     fn distance_matrix(
///         &self,
///         locations: &[Coord<f64>],
///     ) -> Result<DistanceMatrix, DistanceError> {
///         if locations.is_empty() {
///             return Err(DistanceError::EmptyInput);
///         }
///         Ok(DistanceMatrix::from_fn(locations.len(), |_, _| 1))
///     }
/// }
///
/// let matrix = UnitProvider.distance_matrix(&[Coord { x: 0.0, y: 0.0 }])?;
/// assert_eq!(matrix.size(), 1);
/// # Ok::<(), DistanceError>(())
/// ```
pub trait DistanceProvider {
    /// Return a matrix of distances for `locations`.
    ///
    /// Implementations must return `Err(DistanceError::EmptyInput)` when
    /// `locations` is empty.
    fn distance_matrix(&self, locations: &[Coord<f64>]) -> Result<DistanceMatrix, DistanceError>;
}

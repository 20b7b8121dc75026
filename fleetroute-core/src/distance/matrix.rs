use super::error::DistanceError;

/// Dense, row-major matrix of travel distances in metres.
///
/// `get(i, j)` is the cost of travelling from location `i` to location `j`.
/// The diagonal is always zero regardless of how the matrix was built, and
/// no symmetry is assumed. A matrix is immutable once constructed.
///
/// # Examples
/// ```
/// use fleetroute_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::from_fn(3, |from, to| (from * 10 + to) as u64);
/// assert_eq!(matrix.get(0, 0), Some(0));
/// assert_eq!(matrix.get(1, 2), Some(12));
/// assert_eq!(matrix.get(2, 1), Some(21));
/// assert_eq!(matrix.get(3, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<u64>,
}

impl DistanceMatrix {
    /// Build a matrix by evaluating `cost` for every off-diagonal pair.
    ///
    /// `cost` is never called for `from == to`.
    pub fn from_fn<F>(size: usize, mut cost: F) -> Self
    where
        F: FnMut(usize, usize) -> u64,
    {
        let mut cells = Vec::with_capacity(size.saturating_mul(size));
        for from in 0..size {
            for to in 0..size {
                cells.push(if from == to { 0 } else { cost(from, to) });
            }
        }
        Self { size, cells }
    }

    /// Build a matrix from `size * size` row-major cells.
    ///
    /// Diagonal cells are forced to zero.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::DimensionMismatch`] when the cell count is not
    /// `size * size`.
    pub fn from_row_major(size: usize, mut cells: Vec<u64>) -> Result<Self, DistanceError> {
        if cells.len() != size.saturating_mul(size) {
            return Err(DistanceError::DimensionMismatch {
                expected: size,
                found: cells.len(),
            });
        }
        for index in 0..size {
            if let Some(cell) = cells.get_mut(index * size + index) {
                *cell = 0;
            }
        }
        Ok(Self { size, cells })
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::DimensionMismatch`] when any row length differs
    /// from the number of rows.
    ///
    /// # Examples
    /// ```
    /// use fleetroute_core::{DistanceError, DistanceMatrix};
    ///
    /// let matrix = DistanceMatrix::from_rows(vec![vec![9, 5], vec![6, 9]])?;
    /// assert_eq!(matrix.get(0, 0), Some(0));
    /// assert_eq!(matrix.get(0, 1), Some(5));
    ///
    /// let ragged = DistanceMatrix::from_rows(vec![vec![0, 1], vec![1]]);
    /// assert!(ragged.is_err());
    /// # Ok::<(), DistanceError>(())
    /// ```
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, DistanceError> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != size) {
            return Err(DistanceError::DimensionMismatch {
                expected: size,
                found: row.len(),
            });
        }
        Self::from_row_major(size, rows.into_iter().flatten().collect())
    }

    /// Number of locations covered by the matrix.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix covers no locations.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from `from` to `to`, or `None` when either index is out of
    /// range.
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells.get(from * self.size + to).copied()
    }

    /// Outgoing distances from `from`.
    pub fn row(&self, from: usize) -> Option<&[u64]> {
        if from >= self.size {
            return None;
        }
        let start = from * self.size;
        self.cells.get(start..start + self.size)
    }

    /// Iterate over rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.cells.chunks(self.size.max(1)).take(self.size)
    }
}

//! Concurrent assembly of a distance matrix from pairwise queries.

use std::future::Future;
use std::time::Duration;

use fleetroute_core::{DistanceError, DistanceMatrix};
use futures_util::stream::{self, StreamExt};

/// Scheduling limits for [`assemble_matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Maximum number of queries in flight at once. Zero is treated as one.
    pub max_in_flight: usize,
    /// Attempts per pair, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause before retry `n`, multiplied by `n`.
    pub retry_backoff: Duration,
    /// Bound on the whole assembly.
    pub deadline: Option<Duration>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(250),
            deadline: None,
        }
    }
}

/// Build a `size` x `size` matrix by calling `query(from, to)` for every
/// ordered pair with `from != to`.
///
/// Diagonal cells are zero and never queried. Results may complete in any
/// order; each lands in its own cell. A query failing with a transient
/// [`DistanceError`] is retried up to [`AssemblyOptions::max_attempts`]
/// times. The first failure that is not retried aborts the assembly and
/// drops every outstanding query.
///
/// # Errors
///
/// - [`DistanceError::EmptyInput`] when `size` is zero.
/// - [`DistanceError::DeadlineExceeded`] when the deadline elapses first.
/// - The last error of the first pair that could not be priced.
///
/// # Examples
/// ```
/// use fleetroute_data::routing::{AssemblyOptions, assemble_matrix};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let matrix = assemble_matrix(3, &AssemblyOptions::default(), |from, to| async move {
///     Ok(u64::try_from(from * 10 + to).unwrap_or_default())
/// })
/// .await?;
/// assert_eq!(matrix.get(2, 1), Some(21));
/// assert_eq!(matrix.get(1, 1), Some(0));
/// # Ok::<(), fleetroute_core::DistanceError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub async fn assemble_matrix<F, Fut>(
    size: usize,
    options: &AssemblyOptions,
    query: F,
) -> Result<DistanceMatrix, DistanceError>
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<u64, DistanceError>>,
{
    if size == 0 {
        return Err(DistanceError::EmptyInput);
    }
    let build = fill_cells(size, options, &query);
    match options.deadline {
        Some(deadline) => tokio::time::timeout(deadline, build)
            .await
            .map_err(|_| DistanceError::DeadlineExceeded {
                deadline_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            })?,
        None => build.await,
    }
}

async fn fill_cells<F, Fut>(
    size: usize,
    options: &AssemblyOptions,
    query: &F,
) -> Result<DistanceMatrix, DistanceError>
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<u64, DistanceError>>,
{
    let pairs = (0..size).flat_map(move |from| {
        (0..size)
            .filter(move |&to| to != from)
            .map(move |to| (from, to))
    });
    let mut pending = stream::iter(pairs)
        .map(|(from, to)| async move {
            query_with_retry(from, to, options, query)
                .await
                .map(|distance| (from, to, distance))
        })
        .buffer_unordered(options.max_in_flight.max(1));

    let mut cells = vec![0_u64; size.saturating_mul(size)];
    while let Some(outcome) = pending.next().await {
        let (from, to, distance) = outcome?;
        if let Some(cell) = cells.get_mut(from * size + to) {
            *cell = distance;
        }
    }
    log::debug!("assembled {size}x{size} distance matrix");
    DistanceMatrix::from_row_major(size, cells)
}

async fn query_with_retry<F, Fut>(
    from: usize,
    to: usize,
    options: &AssemblyOptions,
    query: &F,
) -> Result<u64, DistanceError>
where
    F: Fn(usize, usize) -> Fut,
    Fut: Future<Output = Result<u64, DistanceError>>,
{
    let mut attempt = 1_u32;
    loop {
        match query(from, to).await {
            Ok(distance) => return Ok(distance),
            Err(err) if err.is_transient() && attempt < options.max_attempts => {
                log::warn!(
                    "distance query {from}->{to} failed on attempt {attempt}, retrying: {err}"
                );
                tokio::time::sleep(options.retry_backoff.saturating_mul(attempt)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

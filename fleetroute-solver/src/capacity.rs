//! Running demand totals for in-progress routes.

use std::fmt;

/// A commit that would push a route past its capacity.
///
/// Reaching this means a caller skipped [`CapacityTracker::can_insert`]; the
/// solver reports it as an internal invariant violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityViolation {
    /// Route the commit targeted.
    pub route: usize,
    /// Load before the attempted commit.
    pub load: u32,
    /// Demand that was rejected.
    pub demand: u32,
    /// Capacity of the route's vehicle, or `None` for an unknown route.
    pub capacity: Option<u32>,
}

impl fmt::Display for CapacityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.capacity {
            Some(capacity) => write!(
                f,
                "route {} with load {} cannot take demand {} within capacity {capacity}",
                self.route, self.load, self.demand
            ),
            None => write!(f, "route {} does not exist", self.route),
        }
    }
}

impl std::error::Error for CapacityViolation {}

/// Per-route load counters checked against vehicle capacities.
///
/// # Examples
/// ```
/// use fleetroute_solver::CapacityTracker;
///
/// let mut tracker = CapacityTracker::new(&[3, 10], 0);
/// assert!(tracker.can_insert(0, 2));
/// tracker.commit(0, 2)?;
/// assert!(!tracker.can_insert(0, 2));
/// assert_eq!(tracker.remaining(0), Some(1));
/// # Ok::<(), fleetroute_solver::CapacityViolation>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityTracker {
    capacities: Vec<u32>,
    loads: Vec<u32>,
}

impl CapacityTracker {
    /// Track one route per capacity, each starting at `initial_load`.
    ///
    /// `initial_load` is the depot demand carried by every vehicle. Callers
    /// validate that it fits each capacity; a route whose vehicle cannot hold
    /// it accepts no insertions.
    #[must_use]
    pub fn new(capacities: &[u32], initial_load: u32) -> Self {
        Self {
            capacities: capacities.to_vec(),
            loads: vec![initial_load; capacities.len()],
        }
    }

    /// Whether `route` can take `demand` more units.
    ///
    /// Unknown routes accept nothing.
    #[must_use]
    pub fn can_insert(&self, route: usize, demand: u32) -> bool {
        match (self.loads.get(route), self.capacities.get(route)) {
            (Some(load), Some(capacity)) => load
                .checked_add(demand)
                .is_some_and(|total| total <= *capacity),
            _ => false,
        }
    }

    /// Add `demand` to `route`'s load.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityViolation`] and leaves the load unchanged when the
    /// insertion does not fit or the route is unknown.
    pub fn commit(&mut self, route: usize, demand: u32) -> Result<(), CapacityViolation> {
        let capacity = self.capacities.get(route).copied();
        let Some(load) = self.loads.get_mut(route) else {
            return Err(CapacityViolation {
                route,
                load: 0,
                demand,
                capacity,
            });
        };
        match load.checked_add(demand) {
            Some(total) if capacity.is_some_and(|limit| total <= limit) => {
                *load = total;
                Ok(())
            }
            _ => Err(CapacityViolation {
                route,
                load: *load,
                demand,
                capacity,
            }),
        }
    }

    /// Remove `demand` from `route`'s load, as when a customer leaves it.
    pub fn release(&mut self, route: usize, demand: u32) {
        if let Some(load) = self.loads.get_mut(route) {
            *load = load.saturating_sub(demand);
        }
    }

    /// Current load of `route`.
    #[must_use]
    pub fn load(&self, route: usize) -> Option<u32> {
        self.loads.get(route).copied()
    }

    /// Capacity of `route`'s vehicle.
    #[must_use]
    pub fn capacity(&self, route: usize) -> Option<u32> {
        self.capacities.get(route).copied()
    }

    /// Units `route` can still take.
    #[must_use]
    pub fn remaining(&self, route: usize) -> Option<u32> {
        Some(self.capacity(route)?.saturating_sub(self.load(route)?))
    }

    /// Number of routes tracked.
    #[must_use]
    pub const fn route_count(&self) -> usize {
        self.capacities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 0, 10, true)]
    #[case(10, 4, 7, false)]
    #[case(3, 2, 2, false)]
    #[case(0, 0, 0, true)]
    #[case(u32::MAX, 1, u32::MAX, false)]
    fn can_insert_compares_against_capacity(
        #[case] capacity: u32,
        #[case] preload: u32,
        #[case] demand: u32,
        #[case] expected: bool,
    ) {
        let tracker = CapacityTracker::new(&[capacity], preload);
        assert_eq!(tracker.can_insert(0, demand), expected);
    }

    #[rstest]
    fn commit_accumulates_load() {
        let mut tracker = CapacityTracker::new(&[10], 1);
        tracker.commit(0, 3).expect("fits");
        tracker.commit(0, 4).expect("fits");
        assert_eq!(tracker.load(0), Some(8));
        assert_eq!(tracker.remaining(0), Some(2));
    }

    #[rstest]
    fn commit_past_capacity_is_a_violation() {
        let mut tracker = CapacityTracker::new(&[5], 0);
        tracker.commit(0, 4).expect("fits");
        let violation = tracker.commit(0, 2).expect_err("exceeds capacity");
        assert_eq!(violation.load, 4);
        assert_eq!(violation.capacity, Some(5));
        assert_eq!(tracker.load(0), Some(4));
    }

    #[rstest]
    fn unknown_routes_accept_nothing() {
        let mut tracker = CapacityTracker::new(&[5], 0);
        assert!(!tracker.can_insert(1, 0));
        assert!(tracker.commit(1, 0).is_err());
        assert_eq!(tracker.remaining(1), None);
    }

    #[rstest]
    fn release_returns_capacity() {
        let mut tracker = CapacityTracker::new(&[5], 0);
        tracker.commit(0, 5).expect("fits");
        tracker.release(0, 3);
        assert!(tracker.can_insert(0, 3));
    }

    #[rstest]
    fn preload_beyond_capacity_blocks_every_insert() {
        let tracker = CapacityTracker::new(&[2], 3);
        assert!(!tracker.can_insert(0, 0));
        assert_eq!(tracker.remaining(0), Some(0));
    }
}

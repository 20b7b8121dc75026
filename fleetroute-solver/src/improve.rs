//! Capacity-preserving local search over constructed routes.
//!
//! Two move types are available:
//!
//! - **2-opt** reverses a segment of one route. Reversal changes the direction
//!   of every arc inside the segment, so with an asymmetric matrix the move is
//!   evaluated on the full route cost rather than on the four boundary arcs.
//! - **Relocate** moves a single customer to its cheapest position in another
//!   route that still has room for its demand.
//!
//! A move is accepted only when it strictly lowers cost, so the search always
//! terminates and never makes a solution worse.

use fleetroute_core::DEPOT_NODE;

use crate::capacity::{CapacityTracker, CapacityViolation};

/// Local-search settings.
///
/// Both move types are off by default, which leaves the construction result
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Improvement {
    /// Apply intra-route segment reversal.
    pub two_opt: bool,
    /// Move customers between routes.
    pub relocate: bool,
    /// Upper bound on improvement rounds, and on the moves of each type
    /// applied within one round. A relocation scan costs O(n²) route
    /// evaluations, so a solve spends at most `max_passes²` such scans.
    pub max_passes: usize,
}

impl Improvement {
    /// Default bound on improvement rounds.
    pub const DEFAULT_MAX_PASSES: usize = 50;

    /// Settings with both move types enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            two_opt: true,
            relocate: true,
            max_passes: Self::DEFAULT_MAX_PASSES,
        }
    }

    /// Whether any move type is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        (self.two_opt || self.relocate) && self.max_passes > 0
    }
}

impl Default for Improvement {
    fn default() -> Self {
        Self {
            two_opt: false,
            relocate: false,
            max_passes: Self::DEFAULT_MAX_PASSES,
        }
    }
}

/// Cost of driving `route` from the depot and back.
///
/// An empty route costs nothing.
///
/// # Examples
/// ```
/// use fleetroute_solver::route_cost;
///
/// let cost = |from: usize, to: usize| (from * 10 + to) as u64;
/// // 0 -> 1 -> 2 -> 0
/// assert_eq!(route_cost(&[1, 2], &cost), 1 + 12 + 20);
/// assert_eq!(route_cost(&[], &cost), 0);
/// ```
pub fn route_cost<C>(route: &[usize], cost: &C) -> u64
where
    C: Fn(usize, usize) -> u64,
{
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0;
    };
    route
        .windows(2)
        .filter_map(|pair| match pair {
            [from, to] => Some(cost(*from, *to)),
            _ => None,
        })
        .fold(
            cost(DEPOT_NODE, first).saturating_add(cost(last, DEPOT_NODE)),
            u64::saturating_add,
        )
}

/// Improve `routes` in place and return the number of accepted moves.
///
/// Each round applies 2-opt to every route until it stops improving, then
/// relocates customers until no relocation lowers the total cost. Within a
/// round each route takes at most `settings.max_passes` reversals and the
/// fleet at most `settings.max_passes` relocations. Rounds repeat until one
/// makes no change or `settings.max_passes` is reached.
/// Loads in `tracker` follow every relocation.
///
/// # Errors
///
/// Returns [`CapacityViolation`] if a relocation the tracker approved fails to
/// commit, which indicates a defect.
pub fn improve<C, D>(
    routes: &mut [Vec<usize>],
    tracker: &mut CapacityTracker,
    cost: C,
    demand: D,
    settings: &Improvement,
) -> Result<usize, CapacityViolation>
where
    C: Fn(usize, usize) -> u64,
    D: Fn(usize) -> u32,
{
    let mut moves = 0_usize;
    if !settings.is_enabled() {
        return Ok(moves);
    }

    for pass in 0..settings.max_passes {
        let before = moves;
        if settings.two_opt {
            for route in routes.iter_mut() {
                for _ in 0..settings.max_passes {
                    let Some(candidate) = improving_reversal(route, &cost) else {
                        break;
                    };
                    *route = candidate;
                    moves = moves.saturating_add(1);
                }
            }
        }
        if settings.relocate {
            for _ in 0..settings.max_passes {
                let Some(relocation) = best_relocation(routes, tracker, &cost, &demand) else {
                    break;
                };
                apply_relocation(routes, tracker, &relocation, &demand)?;
                moves = moves.saturating_add(1);
            }
        }
        if moves == before {
            log::debug!("local search converged after {pass} rounds with {moves} moves");
            return Ok(moves);
        }
    }
    log::debug!(
        "local search stopped at {} rounds with {moves} moves",
        settings.max_passes
    );
    Ok(moves)
}

/// First segment reversal that lowers the route cost.
fn improving_reversal<C>(route: &[usize], cost: &C) -> Option<Vec<usize>>
where
    C: Fn(usize, usize) -> u64,
{
    let current = route_cost(route, cost);
    let len = route.len();
    for start in 0..len.saturating_sub(1) {
        for end in (start + 1)..len {
            let mut candidate = route.to_vec();
            if let Some(segment) = candidate.get_mut(start..=end) {
                segment.reverse();
            }
            if route_cost(&candidate, cost) < current {
                return Some(candidate);
            }
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Relocation {
    from_route: usize,
    from_position: usize,
    to_route: usize,
    to_position: usize,
    saving: u64,
}

/// Relocation with the largest saving; ties keep the earliest move found.
fn best_relocation<C, D>(
    routes: &[Vec<usize>],
    tracker: &CapacityTracker,
    cost: &C,
    demand: &D,
) -> Option<Relocation>
where
    C: Fn(usize, usize) -> u64,
    D: Fn(usize) -> u32,
{
    let current: Vec<u64> = routes.iter().map(|route| route_cost(route, cost)).collect();
    let mut best: Option<Relocation> = None;

    for (from_route, source) in routes.iter().enumerate() {
        let source_cost = current.get(from_route).copied().unwrap_or_default();
        for (from_position, &node) in source.iter().enumerate() {
            let mut shrunk = source.clone();
            shrunk.remove(from_position);
            let shrunk_cost = route_cost(&shrunk, cost);

            for (to_route, target) in routes.iter().enumerate() {
                if to_route == from_route || !tracker.can_insert(to_route, demand(node)) {
                    continue;
                }
                let target_cost = current.get(to_route).copied().unwrap_or_default();
                let before = source_cost.saturating_add(target_cost);
                for to_position in 0..=target.len() {
                    let mut grown = target.clone();
                    grown.insert(to_position, node);
                    let after = shrunk_cost.saturating_add(route_cost(&grown, cost));
                    if after >= before {
                        continue;
                    }
                    let saving = before - after;
                    if best.as_ref().is_none_or(|found| saving > found.saving) {
                        best = Some(Relocation {
                            from_route,
                            from_position,
                            to_route,
                            to_position,
                            saving,
                        });
                    }
                }
            }
        }
    }
    best
}

fn apply_relocation<D>(
    routes: &mut [Vec<usize>],
    tracker: &mut CapacityTracker,
    relocation: &Relocation,
    demand: &D,
) -> Result<(), CapacityViolation>
where
    D: Fn(usize) -> u32,
{
    let Some(source) = routes.get_mut(relocation.from_route) else {
        return Ok(());
    };
    if relocation.from_position >= source.len() {
        return Ok(());
    }
    let node = source.remove(relocation.from_position);
    let node_demand = demand(node);
    tracker.commit(relocation.to_route, node_demand)?;
    tracker.release(relocation.from_route, node_demand);
    if let Some(target) = routes.get_mut(relocation.to_route) {
        let position = relocation.to_position.min(target.len());
        target.insert(position, node);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup(matrix: &[Vec<u64>]) -> impl Fn(usize, usize) -> u64 + '_ {
        |from, to| {
            matrix
                .get(from)
                .and_then(|row| row.get(to))
                .copied()
                .unwrap_or(u64::MAX)
        }
    }

    /// Nodes on a line at positions 0, 1, 2, 3 with symmetric distances.
    fn line() -> Vec<Vec<u64>> {
        (0..4_u64)
            .map(|from| (0..4_u64).map(|to| from.abs_diff(to)).collect())
            .collect()
    }

    #[rstest]
    fn disabled_settings_leave_routes_alone() {
        let matrix = line();
        let mut routes = vec![vec![3, 1, 2]];
        let mut tracker = CapacityTracker::new(&[10], 3);
        let moves = improve(
            &mut routes,
            &mut tracker,
            lookup(&matrix),
            |_| 1,
            &Improvement::default(),
        )
        .expect("no violation");
        assert_eq!(moves, 0);
        assert_eq!(routes, vec![vec![3, 1, 2]]);
    }

    #[rstest]
    fn two_opt_removes_a_crossing() {
        let matrix = line();
        let mut routes = vec![vec![2, 1, 3]];
        let mut tracker = CapacityTracker::new(&[10], 3);
        let settings = Improvement {
            two_opt: true,
            relocate: false,
            max_passes: 5,
        };
        let before = route_cost(&[2, 1, 3], &lookup(&matrix));
        improve(&mut routes, &mut tracker, lookup(&matrix), |_| 1, &settings)
            .expect("no violation");
        let after = routes
            .first()
            .map(|route| route_cost(route, &lookup(&matrix)))
            .expect("one route");
        assert!(after < before);
        assert_eq!(after, 6);
    }

    #[rstest]
    fn relocate_respects_target_capacity() {
        let matrix = line();
        // Route 1 is full, so node 3 cannot join it even if cheaper.
        let mut routes = vec![vec![1, 3], vec![2]];
        let mut tracker = CapacityTracker::new(&[2, 1], 0);
        tracker.commit(0, 2).expect("fits");
        tracker.commit(1, 1).expect("fits");
        let settings = Improvement {
            two_opt: false,
            relocate: true,
            max_passes: 5,
        };
        improve(&mut routes, &mut tracker, lookup(&matrix), |_| 1, &settings)
            .expect("no violation");
        for route in 0..2 {
            let load = tracker.load(route).expect("known route");
            let capacity = tracker.capacity(route).expect("known route");
            assert!(load <= capacity);
        }
        assert_eq!(routes.iter().map(Vec::len).sum::<usize>(), 3);
    }

    #[rstest]
    fn relocate_merges_routes_when_cheaper() {
        let matrix = line();
        let mut routes = vec![vec![1], vec![2]];
        let mut tracker = CapacityTracker::new(&[5, 5], 0);
        tracker.commit(0, 1).expect("fits");
        tracker.commit(1, 1).expect("fits");
        let settings = Improvement {
            two_opt: false,
            relocate: true,
            max_passes: 5,
        };
        let moves = improve(&mut routes, &mut tracker, lookup(&matrix), |_| 1, &settings)
            .expect("no violation");
        assert_eq!(moves, 1);
        assert_eq!(routes, vec![Vec::<usize>::new(), vec![1, 2]]);
        assert_eq!(tracker.load(0), Some(0));
        assert_eq!(tracker.load(1), Some(2));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(5, 2)]
    fn relocations_per_round_are_bounded(#[case] max_passes: usize, #[case] expected: usize) {
        let matrix = line();
        let mut routes = vec![vec![1], vec![2], vec![3]];
        let mut tracker = CapacityTracker::new(&[5, 5, 5], 0);
        for route in 0..3 {
            tracker.commit(route, 1).expect("fits");
        }
        let settings = Improvement {
            two_opt: false,
            relocate: true,
            max_passes,
        };
        let moves = improve(&mut routes, &mut tracker, lookup(&matrix), |_| 1, &settings)
            .expect("no violation");
        assert_eq!(moves, expected);
        assert_eq!(routes.iter().map(Vec::len).sum::<usize>(), 3);
    }

    #[rstest]
    fn empty_and_single_routes_cost_out_and_back() {
        let matrix = line();
        assert_eq!(route_cost(&[], &lookup(&matrix)), 0);
        assert_eq!(route_cost(&[3], &lookup(&matrix)), 6);
    }
}

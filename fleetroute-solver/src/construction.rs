//! Greedy route construction by cheapest feasible arc.

use std::collections::BTreeSet;

use fleetroute_core::DEPOT_NODE;

use crate::capacity::{CapacityTracker, CapacityViolation};

/// Routes built by [`cheapest_arc`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Construction {
    /// Visited customer nodes per vehicle, in visiting order. The depot is
    /// implicit at both ends.
    pub routes: Vec<Vec<usize>>,
    /// Customer nodes no vehicle could take, in ascending order.
    pub unrouted: Vec<usize>,
}

impl Construction {
    /// Whether every customer node was placed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unrouted.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Arc {
    cost: u64,
    route: usize,
    node: usize,
}

/// Build one route per tracked vehicle by repeatedly taking the cheapest
/// feasible arc.
///
/// Each step considers every (route, unrouted customer) pair, extending the
/// route from its current end. Only pairs the tracker accepts are eligible.
/// The cheapest wins; ties go to the lowest route index, then the lowest
/// node index. Construction stops when every customer is placed or no pair
/// fits, leaving the rest in [`Construction::unrouted`].
///
/// `cost(i, j)` is the arc cost from node `i` to node `j` and `demand(i)` is
/// the demand of node `i`. Nodes run from `0` to `node_count - 1` with the
/// depot at [`DEPOT_NODE`].
///
/// # Errors
///
/// Returns [`CapacityViolation`] if the tracker rejects a commit it had just
/// approved, which indicates a defect.
///
/// # Examples
/// ```
/// use fleetroute_solver::{CapacityTracker, cheapest_arc};
///
/// let costs = [[0, 5, 6], [5, 0, 2], [6, 2, 0]];
/// let demands = [0, 3, 4];
/// let mut tracker = CapacityTracker::new(&[10], 0);
///
/// let built = cheapest_arc(
///     3,
///     &mut tracker,
///     |from, to| costs.get(from).and_then(|row| row.get(to)).copied().unwrap_or(u64::MAX),
///     |node| demands.get(node).copied().unwrap_or(0),
/// )?;
///
/// assert_eq!(built.routes, vec![vec![1, 2]]);
/// assert!(built.is_complete());
/// # Ok::<(), fleetroute_solver::CapacityViolation>(())
/// ```
pub fn cheapest_arc<C, D>(
    node_count: usize,
    tracker: &mut CapacityTracker,
    cost: C,
    demand: D,
) -> Result<Construction, CapacityViolation>
where
    C: Fn(usize, usize) -> u64,
    D: Fn(usize) -> u32,
{
    let vehicle_count = tracker.route_count();
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); vehicle_count];
    let mut ends = vec![DEPOT_NODE; vehicle_count];
    let mut unrouted: BTreeSet<usize> = (0..node_count).filter(|n| *n != DEPOT_NODE).collect();

    while !unrouted.is_empty() {
        let Some(arc) = cheapest_feasible_arc(&ends, &unrouted, tracker, &cost, &demand) else {
            break;
        };
        tracker.commit(arc.route, demand(arc.node))?;
        if let Some(route) = routes.get_mut(arc.route) {
            route.push(arc.node);
        }
        if let Some(end) = ends.get_mut(arc.route) {
            *end = arc.node;
        }
        unrouted.remove(&arc.node);
    }

    log::debug!(
        "cheapest-arc construction placed {} of {} customers on {vehicle_count} vehicles",
        node_count.saturating_sub(1).saturating_sub(unrouted.len()),
        node_count.saturating_sub(1),
    );

    Ok(Construction {
        routes,
        unrouted: unrouted.into_iter().collect(),
    })
}

fn cheapest_feasible_arc<C, D>(
    ends: &[usize],
    unrouted: &BTreeSet<usize>,
    tracker: &CapacityTracker,
    cost: &C,
    demand: &D,
) -> Option<Arc>
where
    C: Fn(usize, usize) -> u64,
    D: Fn(usize) -> u32,
{
    let mut best: Option<Arc> = None;
    for (route, &end) in ends.iter().enumerate() {
        for &node in unrouted {
            if !tracker.can_insert(route, demand(node)) {
                continue;
            }
            let candidate = Arc {
                cost: cost(end, node),
                route,
                node,
            };
            // Strict comparison keeps the earliest route and node on ties.
            if best.is_none_or(|current| candidate.cost < current.cost) {
                best = Some(candidate);
            }
        }
    }
    best
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

    fn demands(values: &[u32]) -> impl Fn(usize) -> u32 + '_ {
        |node| values.get(node).copied().unwrap_or(0)
    }

    #[rstest]
    fn first_arc_goes_to_nearest_customer() {
        let matrix = vec![vec![0, 5, 6], vec![5, 0, 2], vec![6, 2, 0]];
        let mut tracker = CapacityTracker::new(&[10], 0);
        let built = cheapest_arc(3, &mut tracker, lookup(&matrix), demands(&[0, 3, 4]))
            .expect("no violation");
        assert_eq!(built.routes, vec![vec![1, 2]]);
        assert_eq!(tracker.load(0), Some(7));
    }

    #[rstest]
    fn ties_prefer_lowest_vehicle_then_lowest_node() {
        let matrix = vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]];
        let mut tracker = CapacityTracker::new(&[1, 1], 0);
        let built = cheapest_arc(3, &mut tracker, lookup(&matrix), demands(&[0, 1, 1]))
            .expect("no violation");
        assert_eq!(built.routes, vec![vec![1], vec![2]]);
    }

    #[rstest]
    fn unplaceable_customers_are_left_unrouted() {
        let matrix = vec![vec![0, 1, 2], vec![1, 0, 1], vec![2, 1, 0]];
        let mut tracker = CapacityTracker::new(&[10], 0);
        let built = cheapest_arc(3, &mut tracker, lookup(&matrix), demands(&[0, 6, 6]))
            .expect("no violation");
        assert_eq!(built.routes, vec![vec![1]]);
        assert_eq!(built.unrouted, vec![2]);
        assert!(!built.is_complete());
    }

    #[rstest]
    fn asymmetric_costs_follow_the_outgoing_arc() {
        // From the depot node 2 is cheaper; from node 2 the return leg is
        // irrelevant, only 2 -> 1 counts.
        let matrix = vec![vec![0, 9, 3], vec![1, 0, 1], vec![1, 4, 0]];
        let mut tracker = CapacityTracker::new(&[10], 0);
        let built = cheapest_arc(3, &mut tracker, lookup(&matrix), demands(&[0, 1, 1]))
            .expect("no violation");
        assert_eq!(built.routes, vec![vec![2, 1]]);
    }

    #[rstest]
    fn depot_only_yields_empty_routes() {
        let mut tracker = CapacityTracker::new(&[4, 4], 0);
        let built = cheapest_arc(1, &mut tracker, |_, _| 0, |_| 0).expect("no violation");
        assert_eq!(built.routes, vec![Vec::<usize>::new(), Vec::new()]);
        assert!(built.is_complete());
    }

    #[rstest]
    fn zero_vehicles_route_nothing() {
        let mut tracker = CapacityTracker::new(&[], 0);
        let built = cheapest_arc(3, &mut tracker, |_, _| 1, |_| 1).expect("no violation");
        assert!(built.routes.is_empty());
        assert_eq!(built.unrouted, vec![1, 2]);
    }
}

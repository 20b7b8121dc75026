//! Per-vehicle visit sequences produced by a solve.

use std::collections::BTreeMap;

use crate::{CustomerId, VehicleId};

/// Ordered visits assigned to one vehicle.
///
/// The depot is implicit at both ends and never appears in `customers`.
/// `distance` includes the departure arc from the depot and the return arc to
/// it; an empty route has zero distance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleRoute {
    /// Position of the vehicle in the problem's fleet.
    pub vehicle_index: usize,
    /// Persisted identity of the vehicle.
    pub vehicle_id: VehicleId,
    /// Customer ids in visiting order.
    pub customers: Vec<CustomerId>,
    /// Accumulated demand, depot preload included.
    pub load: u32,
    /// Total travel distance in metres.
    pub distance: u64,
}

impl VehicleRoute {
    /// Whether the vehicle visits no customers.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// Routes for every vehicle in fleet order.
///
/// # Examples
/// ```
/// use fleetroute_core::{Solution, VehicleRoute};
///
/// let solution = Solution::new(vec![
///     VehicleRoute {
///         vehicle_index: 0,
///         vehicle_id: 7,
///         customers: vec![2, 3],
///         load: 5,
///         distance: 12,
///     },
///     VehicleRoute {
///         vehicle_index: 1,
///         vehicle_id: 9,
///         customers: Vec::new(),
///         load: 0,
///         distance: 0,
///     },
/// ]);
///
/// assert_eq!(solution.total_distance(), 12);
/// assert_eq!(solution.by_vehicle_index()[&0], vec![2, 3]);
/// assert_eq!(solution.by_vehicle_id()[&9], Vec::<u64>::new());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    routes: Vec<VehicleRoute>,
}

impl Solution {
    /// Wrap routes, which must already be in fleet order.
    pub const fn new(routes: Vec<VehicleRoute>) -> Self {
        Self { routes }
    }

    /// All routes, including empty ones.
    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    /// Route driven by the vehicle at `vehicle_index`.
    pub fn route_for(&self, vehicle_index: usize) -> Option<&VehicleRoute> {
        self.routes.get(vehicle_index)
    }

    /// Customer ids keyed by positional vehicle index.
    ///
    /// Every vehicle has an entry, empty routes included.
    pub fn by_vehicle_index(&self) -> BTreeMap<usize, Vec<CustomerId>> {
        self.routes
            .iter()
            .map(|route| (route.vehicle_index, route.customers.clone()))
            .collect()
    }

    /// Customer ids keyed by persisted vehicle id.
    pub fn by_vehicle_id(&self) -> BTreeMap<VehicleId, Vec<CustomerId>> {
        self.routes
            .iter()
            .map(|route| (route.vehicle_id, route.customers.clone()))
            .collect()
    }

    /// Sum of every route's distance.
    pub fn total_distance(&self) -> u64 {
        self.routes.iter().map(|route| route.distance).sum()
    }

    /// Number of customers visited across all routes.
    pub fn routed_customers(&self) -> usize {
        self.routes.iter().map(|route| route.customers.len()).sum()
    }
}

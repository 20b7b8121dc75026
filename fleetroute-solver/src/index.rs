//! Bijection between customer identities and solver node indices.

use std::collections::HashMap;

use fleetroute_core::{Customer, CustomerId, DEPOT_NODE, SolveError};

/// Dense node indices for the customers of one solve.
///
/// Node `i` is the customer at position `i` of the input slice. Node
/// [`DEPOT_NODE`] is the depot and is both the start and the end node of
/// every vehicle.
///
/// # Examples
/// ```
/// use fleetroute_core::Customer;
/// use fleetroute_solver::RoutingIndex;
///
/// let customers = [
///     Customer::from_lat_lon(100, 0.0, 0.0, 0),
///     Customer::from_lat_lon(42, 0.0, 0.0, 1),
/// ];
/// let index = RoutingIndex::new(&customers, 2)?;
///
/// assert_eq!(index.index_of(42), Some(1));
/// assert_eq!(index.identity_of(0), Some(100));
/// assert_eq!(index.start_node(1), Some(0));
/// assert!(index.is_end(&[1], 1));
/// # Ok::<(), fleetroute_core::SolveError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingIndex {
    identities: Vec<CustomerId>,
    positions: HashMap<CustomerId, usize>,
    vehicle_count: usize,
}

impl RoutingIndex {
    /// Build the index for `customers`, depot first.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::DuplicateCustomer`] when two customers share an
    /// id, since the mapping would not be injective.
    pub fn new(customers: &[Customer], vehicle_count: usize) -> Result<Self, SolveError> {
        let mut positions = HashMap::with_capacity(customers.len());
        for (node, customer) in customers.iter().enumerate() {
            if positions.insert(customer.id, node).is_some() {
                return Err(SolveError::DuplicateCustomer { id: customer.id });
            }
        }
        Ok(Self {
            identities: customers.iter().map(|customer| customer.id).collect(),
            positions,
            vehicle_count,
        })
    }

    /// Customer id held by `node`.
    #[must_use]
    pub fn identity_of(&self, node: usize) -> Option<CustomerId> {
        self.identities.get(node).copied()
    }

    /// Node index of the customer with `id`.
    #[must_use]
    pub fn index_of(&self, id: CustomerId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// First node of `vehicle`'s route, or `None` for an unknown vehicle.
    #[must_use]
    pub const fn start_node(&self, vehicle: usize) -> Option<usize> {
        if vehicle < self.vehicle_count {
            Some(DEPOT_NODE)
        } else {
            None
        }
    }

    /// Last node of `vehicle`'s route, or `None` for an unknown vehicle.
    #[must_use]
    pub const fn end_node(&self, vehicle: usize) -> Option<usize> {
        self.start_node(vehicle)
    }

    /// Whether traversal position `position` of `route` is the return to the
    /// depot.
    ///
    /// `route` holds visited customer nodes only. Positions `0..route.len()`
    /// are visits; every position from `route.len()` onwards is the route's
    /// termination.
    #[must_use]
    pub const fn is_end(&self, route: &[usize], position: usize) -> bool {
        position >= route.len()
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.identities.len()
    }

    /// Number of vehicles sharing the depot.
    #[must_use]
    pub const fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Customer nodes in ascending order, depot excluded.
    pub fn customer_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.identities.len()).filter(|node| *node != DEPOT_NODE)
    }
}

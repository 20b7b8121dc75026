//! The immutable input snapshot of one solve.

use std::collections::HashSet;

use geo::Coord;

use crate::{Customer, SolveError, Vehicle};

/// Node index of the depot.
///
/// The depot is the first customer of a [`Problem`] and the start and end
/// node of every vehicle.
pub const DEPOT_NODE: usize = 0;

/// Customers and vehicles captured for a single solve.
///
/// Customer positions are node indices: the customer at position
/// [`DEPOT_NODE`] is the depot. Its demand is preloaded onto every vehicle,
/// so a depot with zero demand behaves as a plain start/end location.
///
/// # Examples
/// ```
/// use fleetroute_core::{Customer, Problem, Vehicle};
///
/// let problem = Problem::new(
///     vec![
///         Customer::from_lat_lon(10, 52.50, 13.40, 0),
///         Customer::from_lat_lon(11, 52.51, 13.41, 4),
///     ],
///     vec![Vehicle::new(1, 10)],
/// );
///
/// assert_eq!(problem.depot().map(|depot| depot.id), Some(10));
/// assert_eq!(problem.node_count(), 2);
/// assert!(problem.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Problem {
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
}

impl Problem {
    /// Capture a snapshot. No validation happens here; see
    /// [`Problem::validate`].
    pub const fn new(customers: Vec<Customer>, vehicles: Vec<Vehicle>) -> Self {
        Self {
            customers,
            vehicles,
        }
    }

    /// Customers in node-index order, depot first.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Vehicles in fleet order. Positions are the vehicle indices used by the
    /// solver and by [`crate::Solution::by_vehicle_index`].
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The depot, if any customers were supplied.
    pub fn depot(&self) -> Option<&Customer> {
        self.customers.get(DEPOT_NODE)
    }

    /// Number of nodes, depot included.
    pub fn node_count(&self) -> usize {
        self.customers.len()
    }

    /// Locations in node-index order, ready for a distance provider.
    pub fn locations(&self) -> Vec<Coord<f64>> {
        self.customers.iter().map(|c| c.location).collect()
    }

    /// Demand preloaded onto every vehicle by the depot.
    pub fn depot_demand(&self) -> u32 {
        self.depot().map_or(0, |depot| depot.demand)
    }

    /// Largest vehicle capacity, or `None` for an empty fleet.
    pub fn max_capacity(&self) -> Option<u32> {
        self.vehicles.iter().map(|v| v.capacity).max()
    }

    /// Check the preconditions of a solve.
    ///
    /// # Errors
    ///
    /// - [`SolveError::NoData`] when there are no customers or no vehicles.
    /// - [`SolveError::DuplicateCustomer`] when two customers share an id.
    /// - [`SolveError::DepotPreload`] when some vehicle cannot carry the
    ///   depot's own demand.
    /// - [`SolveError::Oversized`] when a customer's demand, together with
    ///   the depot preload, exceeds every vehicle's capacity.
    pub fn validate(&self) -> Result<(), SolveError> {
        let Some(max_capacity) = self.max_capacity().filter(|_| !self.customers.is_empty())
        else {
            return Err(SolveError::NoData {
                customers: self.customers.len(),
                vehicles: self.vehicles.len(),
            });
        };

        let mut seen = HashSet::with_capacity(self.customers.len());
        if let Some(duplicate) = self.customers.iter().find(|c| !seen.insert(c.id)) {
            return Err(SolveError::DuplicateCustomer { id: duplicate.id });
        }

        let depot_demand = self.depot_demand();
        if let (Some(depot), Some(vehicle)) = (
            self.depot(),
            self.vehicles.iter().find(|v| v.capacity < depot_demand),
        ) {
            return Err(SolveError::DepotPreload {
                depot: depot.id,
                demand: depot_demand,
                vehicle: vehicle.id,
                capacity: vehicle.capacity,
            });
        }

        let preload = u64::from(depot_demand);
        let oversized = self
            .customers
            .iter()
            .skip(DEPOT_NODE + 1)
            .find(|c| preload + u64::from(c.demand) > u64::from(max_capacity));
        if let Some(customer) = oversized {
            return Err(SolveError::Oversized {
                customer: customer.id,
                demand: customer.demand,
                max_capacity,
            });
        }
        Ok(())
    }
}

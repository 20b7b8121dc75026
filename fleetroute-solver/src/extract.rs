//! Translation of node-index routes back to customer identities.

use fleetroute_core::{DEPOT_NODE, SolveError, Solution, Vehicle, VehicleRoute};

use crate::{capacity::CapacityTracker, improve::route_cost, index::RoutingIndex};

/// Build the [`Solution`] for finished `routes`.
///
/// `routes[v]` holds the customer nodes visited by `vehicles[v]`. Order is
/// preserved exactly and the depot never appears in the output. Loads are
/// read from `tracker` and distances include the return arc to the depot.
///
/// # Errors
///
/// Returns [`SolveError::InvariantViolation`] when the number of routes does
/// not match the fleet, a route contains the depot, or a node is unknown to
/// `index`.
pub fn extract_solution<C>(
    index: &RoutingIndex,
    vehicles: &[Vehicle],
    routes: &[Vec<usize>],
    tracker: &CapacityTracker,
    cost: C,
) -> Result<Solution, SolveError>
where
    C: Fn(usize, usize) -> u64,
{
    if routes.len() != vehicles.len() {
        return Err(SolveError::InvariantViolation {
            message: format!(
                "{} routes were built for {} vehicles",
                routes.len(),
                vehicles.len()
            ),
        });
    }

    let mut extracted = Vec::with_capacity(routes.len());
    for (vehicle_index, (vehicle, route)) in vehicles.iter().zip(routes).enumerate() {
        let customers = route
            .iter()
            .map(|&node| customer_id(index, vehicle_index, node))
            .collect::<Result<Vec<_>, _>>()?;
        extracted.push(VehicleRoute {
            vehicle_index,
            vehicle_id: vehicle.id,
            customers,
            load: tracker.load(vehicle_index).unwrap_or_default(),
            distance: route_cost(route, &cost),
        });
    }
    Ok(Solution::new(extracted))
}

fn customer_id(index: &RoutingIndex, vehicle: usize, node: usize) -> Result<u64, SolveError> {
    if node == DEPOT_NODE {
        return Err(SolveError::InvariantViolation {
            message: format!("route for vehicle {vehicle} visits the depot"),
        });
    }
    index
        .identity_of(node)
        .ok_or_else(|| SolveError::InvariantViolation {
            message: format!("route for vehicle {vehicle} visits unknown node {node}"),
        })
}

/// Persisted vehicle identity as supplied by the data store.
pub type VehicleId = u64;

/// A vehicle that starts and ends at the depot and carries at most
/// `capacity` units of demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Persisted identifier.
    pub id: VehicleId,
    /// Maximum total demand this vehicle can serve.
    pub capacity: u32,
}

impl Vehicle {
    /// Construct a vehicle.
    ///
    /// # Examples
    /// ```
    /// use fleetroute_core::Vehicle;
    ///
    /// let vehicle = Vehicle::new(3, 10);
    /// assert_eq!(vehicle.capacity, 10);
    /// ```
    pub const fn new(id: VehicleId, capacity: u32) -> Self {
        Self { id, capacity }
    }
}

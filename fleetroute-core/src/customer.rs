use geo::Coord;

/// Persisted customer identity as supplied by the data store.
pub type CustomerId = u64;

/// A location with a demand to be served by one vehicle.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fleetroute_core::Customer;
///
/// let customer = Customer::new(7, Coord { x: 13.4, y: 52.5 }, 3);
///
/// assert_eq!(customer.id, 7);
/// assert_eq!(customer.latitude(), 52.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    /// Persisted identifier.
    pub id: CustomerId,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Units of capacity consumed when this customer is visited.
    pub demand: u32,
}

impl Customer {
    /// Construct a customer at `location` with the given demand.
    pub const fn new(id: CustomerId, location: Coord<f64>, demand: u32) -> Self {
        Self {
            id,
            location,
            demand,
        }
    }

    /// Construct a customer from latitude and longitude in degrees.
    ///
    /// # Examples
    /// ```
    /// use fleetroute_core::Customer;
    ///
    /// let customer = Customer::from_lat_lon(1, 52.5, 13.4, 0);
    /// assert_eq!(customer.location.x, 13.4);
    /// assert_eq!(customer.location.y, 52.5);
    /// ```
    pub const fn from_lat_lon(id: CustomerId, latitude: f64, longitude: f64, demand: u32) -> Self {
        Self::new(
            id,
            Coord {
                x: longitude,
                y: latitude,
            },
            demand,
        )
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}

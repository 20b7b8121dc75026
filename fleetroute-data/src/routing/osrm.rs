//! OSRM API response types for the Route service.
//!
//! Only the fields needed to price an arc are decoded: the status `code`, an
//! optional `message`, and the `distance` of each returned route.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use fleetroute_core::DistanceError;
use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Alternative routes, best first. Absent on failure.
    #[serde(default)]
    pub routes: Vec<RouteSummary>,
}

/// One route of a [`RouteResponse`].
#[derive(Debug, Deserialize)]
pub struct RouteSummary {
    /// Route length in metres.
    pub distance: f64,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Distance of the first route in whole metres, truncated toward zero.
    ///
    /// `from` and `to` are the location indices of the query and only label
    /// the [`DistanceError::NoRoute`] failure.
    pub fn into_distance(self, from: usize, to: usize) -> Result<u64, DistanceError> {
        if self.code == "NoRoute" {
            return Err(DistanceError::NoRoute { from, to });
        }
        if !self.is_ok() {
            return Err(DistanceError::ServiceError {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }
        let first = self
            .routes
            .first()
            .ok_or(DistanceError::NoRoute { from, to })?;
        if !first.distance.is_finite() || first.distance < 0.0 {
            return Err(DistanceError::ParseError {
                message: format!("invalid route distance {}", first.distance),
            });
        }
        // Saturates above u64::MAX.
        Ok(first.distance.trunc() as u64)
    }
}

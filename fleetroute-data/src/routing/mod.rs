//! HTTP-based distance providers for routing services.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of
//! [`fleetroute_core::DistanceProvider`] that fills a distance matrix by
//! asking an OSRM routing service for one route per ordered pair of
//! locations.
//!
//! # Architecture
//!
//! Pairwise queries are scheduled by [`assemble_matrix`], which keeps a
//! bounded number of requests in flight, retries transient failures and
//! enforces an optional overall deadline. The synchronous
//! [`fleetroute_core::DistanceProvider`] trait is implemented by blocking on
//! that async assembly internally, keeping the core library embeddable in
//! synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use fleetroute_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
//! use fleetroute_core::DistanceProvider;
//! use geo::Coord;
//!
//! let config = HttpDistanceProviderConfig::new("http://localhost:5000")
//!     .with_max_in_flight(4)
//!     .with_deadline(Duration::from_secs(120));
//! let provider = HttpDistanceProvider::with_config(config)?;
//!
//! let locations = [Coord { x: -0.1, y: 51.5 }, Coord { x: -0.2, y: 51.6 }];
//! let matrix = provider.distance_matrix(&locations)?;
//! println!("depot to first stop: {:?} m", matrix.get(0, 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod assemble;
mod osrm;
mod provider;

pub use assemble::{AssemblyOptions, assemble_matrix};
pub use provider::{
    DEFAULT_USER_AGENT, HttpDistanceProvider, HttpDistanceProviderConfig, ProviderBuildError,
};

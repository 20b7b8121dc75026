//! Travel distances between depot and customer locations.
//!
//! The [`DistanceProvider`] trait abstracts the routing oracle that supplies
//! point-to-point travel distances. Callers pass an ordered slice of
//! coordinates and receive a square [`DistanceMatrix`] whose indices match the
//! input positions.
//!
//! Errors are returned when inputs are invalid, e.g. an empty slice, or when
//! the oracle cannot answer for some pair.

mod error;
mod matrix;
mod provider;

pub use error::DistanceError;
pub use matrix::DistanceMatrix;
pub use provider::DistanceProvider;

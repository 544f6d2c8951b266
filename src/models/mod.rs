//! Core data models for jurisdiction resolution.

pub mod jurisdiction;
pub mod point;

pub use jurisdiction::{Provenance, ResolutionResult, BOUNDARY_UNAVAILABLE};
pub use point::{GeoPoint, GeocodeCandidate};

//! Civitas - resolves a geocoded point to its civic jurisdiction
//!
//! This library provides shared types and modules for the resolve and server binaries.

pub mod api;
pub mod arcgis;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod registry;
pub mod resolver;

pub use arcgis::{ArcGisClient, BoundaryQuery, ClientSettings, QueryOutcome};
pub use diagnostics::Diagnostics;
pub use error::{ConfigError, QueryError, ResolveError};
pub use models::{GeoPoint, GeocodeCandidate, Provenance, ResolutionResult};
pub use registry::{EndpointConfig, Registry};
pub use resolver::{Resolver, ResolverOptions};

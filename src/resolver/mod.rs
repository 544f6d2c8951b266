//! Jurisdiction resolution: county-first search with city overrides.

mod engine;
mod options;

pub use engine::Resolver;
pub use options::{CityFallback, ResolverOptions, SearchStrategy};

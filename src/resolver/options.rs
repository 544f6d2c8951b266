//! Resolution policy knobs.

use serde::{Deserialize, Serialize};

/// How county endpoints are queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// One query at a time, stopping at the first match
    Sequential,
    /// Up to `max_in_flight` queries at once. Results are still consumed in
    /// registry order and outstanding queries are dropped once the earliest
    /// match is known.
    Concurrent { max_in_flight: usize },
}

impl SearchStrategy {
    pub(crate) fn width(&self) -> usize {
        match self {
            SearchStrategy::Sequential => 1,
            SearchStrategy::Concurrent { max_in_flight } => (*max_in_flight).max(1),
        }
    }
}

/// City label used when a county matched but no city override applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityFallback {
    /// "Valid (within <county>)"
    #[default]
    WithinCounty,
    /// "Unincorporated <county>"
    Unincorporated,
    /// No city label; provenance stays county-only
    None,
}

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Region code candidates must carry, compared case-insensitively
    pub expected_region: String,
    pub strategy: SearchStrategy,
    /// Run the city override check even when no county matched
    pub city_without_county: bool,
    pub city_fallback: CityFallback,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            expected_region: "CA".to_string(),
            strategy: SearchStrategy::Sequential,
            city_without_county: false,
            city_fallback: CityFallback::WithinCounty,
        }
    }
}

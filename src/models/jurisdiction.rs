//! Resolution output types.

use serde::{Deserialize, Serialize};

/// Label used for county and city when no authoritative boundary matched.
pub const BOUNDARY_UNAVAILABLE: &str = "Authoritative Boundary Not Available";

/// Which rule path produced a [`ResolutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// County matched; city is a generic label derived from the county
    CountyEndpoint,
    /// City came from an explicit city-level boundary for the locality hint
    CityOverride,
    /// County matched; no city label was produced
    CountyOnly,
    /// No boundary matched
    Unavailable,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::CountyEndpoint => write!(f, "county_endpoint"),
            Provenance::CityOverride => write!(f, "city_override"),
            Provenance::CountyOnly => write!(f, "county_only"),
            Provenance::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Final county/city for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub county: String,
    pub city: String,
    pub provenance: Provenance,
}

impl ResolutionResult {
    pub fn unavailable() -> Self {
        Self {
            county: BOUNDARY_UNAVAILABLE.to_string(),
            city: BOUNDARY_UNAVAILABLE.to_string(),
            provenance: Provenance::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.provenance != Provenance::Unavailable
    }
}

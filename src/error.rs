//! Error taxonomy for jurisdiction resolution.

use std::time::Duration;

/// Malformed or missing jurisdiction configuration. Fatal at load time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read jurisdiction document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Jurisdiction document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Jurisdiction document must be a JSON object")]
    NotAnObject,

    #[error("Section '{0}' must map jurisdiction names to endpoints")]
    InvalidSection(String),

    #[error("Entry '{name}' has an unsupported shape: expected a URL string or an object with 'url'")]
    InvalidEntry { name: String },

    #[error("Entry '{name}' has an empty URL")]
    EmptyUrl { name: String },

    #[error("Entry '{name}' has an invalid URL '{url}': {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
}

/// Errors surfaced at the request boundary, before any endpoint is queried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("Region '{found}' is outside the supported region '{expected}'")]
    OutOfRegion { expected: String, found: String },

    #[error("Invalid coordinates ({latitude}, {longitude})")]
    InvalidPoint { latitude: f64, longitude: f64 },
}

/// Failure of a single boundary service call. Never fatal to resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Boundary service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Failed to parse boundary service response: {0}")]
    ResponseParse(String),

    #[error("Boundary service reported an error: {0}")]
    Service(String),
}

impl QueryError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Network(_) | QueryError::Timeout(_) => true,
            QueryError::HttpStatus(status) => *status >= 500,
            QueryError::ResponseParse(_) | QueryError::Service(_) => false,
        }
    }
}

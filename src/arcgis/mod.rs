//! Spatial containment queries against ArcGIS-style boundary services.
//!
//! A query asks one layer whether it has a feature intersecting a point and,
//! if so, reads a human-readable label from the first matching feature.

mod client;
mod request;
mod response;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::QueryError;
use crate::models::GeoPoint;
use crate::registry::EndpointConfig;

pub use client::{ArcGisClient, ClientSettings};
pub use request::containment_url;
pub use response::{classify, extract_label, UNNAMED_BOUNDARY};

/// Result of a single containment query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Matched(String),
    NoMatch,
    Failed(QueryError),
}

impl QueryOutcome {
    pub fn label(&self) -> Option<&str> {
        match self {
            QueryOutcome::Matched(label) => Some(label),
            _ => None,
        }
    }
}

/// Raw request/response pair behind a [`QueryOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempts: u32,
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
}

impl Exchange {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            status: None,
            body: None,
            error: None,
            attempts: 0,
            elapsed_ms: 0,
            started_at: Utc::now(),
        }
    }
}

/// Outcome of one query together with what went over the wire.
#[derive(Debug, Clone)]
pub struct Probe {
    pub outcome: QueryOutcome,
    pub exchange: Exchange,
}

/// A service able to answer containment queries for one endpoint.
#[async_trait]
pub trait BoundaryQuery: Send + Sync {
    async fn query(&self, endpoint: &EndpointConfig, point: GeoPoint) -> Probe;
}

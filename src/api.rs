//! HTTP API for the resolver: `GET /health` and `GET /v1/resolve`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::diagnostics::DiagnosticRecord;
use crate::{ArcGisClient, Diagnostics, GeocodeCandidate, ResolutionResult, ResolveError, Resolver};

/// Application state shared across handlers
pub struct AppState {
    pub resolver: Resolver<ArcGisClient>,
    /// Whether `debug=true` requests may see raw request/response records
    pub diagnostics_enabled: bool,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/resolve", get(resolve_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.resolver.registry();
    Json(HealthResponse {
        status: if registry.counties().is_empty() {
            "degraded"
        } else {
            "ok"
        },
        county_endpoints: registry.counties().len(),
        city_endpoints: registry.cities().len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    county_endpoints: usize,
    city_endpoints: usize,
}

#[derive(Deserialize)]
struct ResolveQueryParams {
    lat: f64,
    lon: f64,
    /// Region code reported by the geocoder
    region: String,
    locality: Option<String>,
    county: Option<String>,
    /// Include raw request/response records (requires diagnostics enabled in config)
    #[serde(default)]
    debug: bool,
}

#[derive(Serialize)]
struct ResolveResponse {
    #[serde(flatten)]
    result: ResolutionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<Vec<DiagnosticRecord>>,
}

/// Resolve a point to county and city
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQueryParams>,
) -> Result<Json<ResolveResponse>, (StatusCode, String)> {
    let candidate = GeocodeCandidate {
        latitude: params.lat,
        longitude: params.lon,
        county_guess: params.county,
        locality_guess: params.locality,
        region_code: params.region,
    };

    let diagnostics = Diagnostics::new(params.debug && state.diagnostics_enabled);

    let result = state
        .resolver
        .resolve_candidate(&candidate, &diagnostics)
        .await
        .map_err(|e| {
            let status = match e {
                ResolveError::OutOfRegion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ResolveError::InvalidPoint { .. } => StatusCode::BAD_REQUEST,
            };
            (status, e.to_string())
        })?;

    let diagnostics = diagnostics
        .is_enabled()
        .then(|| diagnostics.into_records());

    Ok(Json(ResolveResponse {
        result,
        diagnostics,
    }))
}

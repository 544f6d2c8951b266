//! Fixture boundary service for integration tests.
//!
//! Each layer "contains" points inside a lat/lon box and answers with an
//! ArcGIS-shaped feature set.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

/// Rough box around Sacramento County: (min_lat, max_lat, min_lon, max_lon)
pub const SACRAMENTO_BOX: (f64, f64, f64, f64) = (38.0, 39.0, -122.0, -121.0);
/// Rough box around Yolo County, overlapping Sacramento's western edge
pub const YOLO_BOX: (f64, f64, f64, f64) = (38.3, 38.9, -122.5, -121.4);

pub const DOWNTOWN_SACRAMENTO: (f64, f64) = (38.5823873, -121.493432);

#[derive(Default)]
pub struct FixtureState {
    pub flaky_calls: AtomicUsize,
}

pub struct Fixture {
    pub base: String,
    pub state: Arc<FixtureState>,
}

impl Fixture {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn flaky_calls(&self) -> usize {
        self.state.flaky_calls.load(Ordering::SeqCst)
    }
}

pub async fn spawn_fixture() -> Fixture {
    let state = Arc::new(FixtureState::default());

    let app = Router::new()
        .route("/county/sacramento/query", get(sacramento_county))
        .route("/county/yolo/query", get(yolo_county))
        .route("/county/unnamed/query", get(unnamed_county))
        .route("/city/sacramento/query", get(sacramento_city))
        .route("/broken/query", get(|| async { "<html>Bad Gateway</html>" }))
        .route("/error/query", get(service_error))
        .route("/unavailable/query", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route("/slow/query", get(slow))
        .route("/flaky/query", get(flaky))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Fixture {
        base: format!("http://{}", addr),
        state,
    }
}

/// Address nothing is listening on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/query", addr)
}

type Params = Query<HashMap<String, String>>;

/// Point from a containment request, or a 400 if the request is malformed
fn requested_point(params: &HashMap<String, String>) -> Result<(f64, f64), Response> {
    let well_formed = params.get("geometryType").map(String::as_str) == Some("esriGeometryPoint")
        && params.get("inSR").map(String::as_str) == Some("4326")
        && params.get("spatialRel").map(String::as_str) == Some("esriSpatialRelIntersects")
        && params.get("returnGeometry").map(String::as_str) == Some("false")
        && params.get("f").map(String::as_str) == Some("json")
        && params.contains_key("where");

    let point = params.get("geometry").and_then(|g| {
        let (lon, lat) = g.split_once(',')?;
        Some((lat.parse::<f64>().ok()?, lon.parse::<f64>().ok()?))
    });

    match point {
        Some(point) if well_formed => Ok(point),
        _ => Err((StatusCode::BAD_REQUEST, "malformed containment query").into_response()),
    }
}

fn inside(point: (f64, f64), bounds: (f64, f64, f64, f64)) -> bool {
    let (lat, lon) = point;
    let (min_lat, max_lat, min_lon, max_lon) = bounds;
    (min_lat..=max_lat).contains(&lat) && (min_lon..=max_lon).contains(&lon)
}

fn feature_set(matched: bool, attributes: Value) -> Response {
    let features = if matched {
        vec![json!({ "attributes": attributes })]
    } else {
        vec![]
    };
    Json(json!({ "features": features })).into_response()
}

async fn sacramento_county(Query(params): Params) -> Response {
    match requested_point(&params) {
        Ok(point) => feature_set(
            inside(point, SACRAMENTO_BOX),
            json!({ "NAME": "Sacramento", "OBJECTID": 34 }),
        ),
        Err(response) => response,
    }
}

async fn yolo_county(Query(params): Params) -> Response {
    match requested_point(&params) {
        Ok(point) => feature_set(inside(point, YOLO_BOX), json!({ "NAME": "Yolo" })),
        Err(response) => response,
    }
}

async fn unnamed_county(Query(params): Params) -> Response {
    match requested_point(&params) {
        Ok(point) => feature_set(inside(point, SACRAMENTO_BOX), json!({ "OBJECTID": 1 })),
        Err(response) => response,
    }
}

async fn sacramento_city(Query(params): Params) -> Response {
    match requested_point(&params) {
        Ok(point) => {
            // Only honours the filter it was configured with
            let filter = params.get("where").map(String::as_str);
            let filtered = matches!(filter, Some("CITY_NAME = 'Sacramento'") | Some("1=1"));
            feature_set(
                filtered && inside(point, (38.43, 38.69, -121.56, -121.36)),
                json!({ "CITY_NAME": "Sacramento", "NAME": "" }),
            )
        }
        Err(response) => response,
    }
}

async fn service_error() -> Json<Value> {
    Json(json!({
        "error": { "code": 400, "message": "Unable to complete operation.", "details": [] }
    }))
}

async fn slow(Query(params): Params) -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    sacramento_county(Query(params)).await
}

/// Fails with 503 on the first call, then behaves like the Sacramento layer
async fn flaky(State(state): State<Arc<FixtureState>>, Query(params): Params) -> Response {
    if state.flaky_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    sacramento_county(Query(params)).await
}

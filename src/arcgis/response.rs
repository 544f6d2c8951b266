//! ArcGIS feature-set parsing and label extraction.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::QueryOutcome;
use crate::error::QueryError;
use crate::registry::EndpointConfig;

/// Label for a matched boundary whose source has no usable name attribute
pub const UNNAMED_BOUNDARY: &str = "Boundary Matched (Unnamed)";

#[derive(Debug, Deserialize)]
struct FeatureSet {
    features: Option<Vec<Feature>>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    attributes: Map<String, Value>,
}

/// ArcGIS reports many faults as HTTP 200 with an `error` object.
#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify a successful HTTP response body.
pub fn classify(body: &str, endpoint: &EndpointConfig) -> QueryOutcome {
    let set: FeatureSet = match serde_json::from_str(body) {
        Ok(set) => set,
        Err(e) => return QueryOutcome::Failed(QueryError::ResponseParse(e.to_string())),
    };

    if let Some(err) = set.error {
        let message = err.message.unwrap_or_else(|| "unknown error".to_string());
        let detail = match err.code {
            Some(code) => format!("{} ({})", message, code),
            None => message,
        };
        return QueryOutcome::Failed(QueryError::Service(detail));
    }

    let Some(features) = set.features else {
        return QueryOutcome::Failed(QueryError::ResponseParse(
            "missing 'features' array".to_string(),
        ));
    };

    match features.first() {
        Some(feature) => QueryOutcome::Matched(extract_label(&feature.attributes, endpoint)),
        None => QueryOutcome::NoMatch,
    }
}

/// First non-empty candidate attribute, then the configured fallback, then
/// [`UNNAMED_BOUNDARY`].
pub fn extract_label(attributes: &Map<String, Value>, endpoint: &EndpointConfig) -> String {
    endpoint
        .field_candidates
        .iter()
        .filter_map(|field| attributes.get(field).and_then(attribute_text))
        .next()
        .or_else(|| endpoint.fallback_label.clone())
        .unwrap_or_else(|| UNNAMED_BOUNDARY.to_string())
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

//! Containment query URL construction.

use url::Url;

use crate::error::QueryError;
use crate::models::GeoPoint;
use crate::registry::EndpointConfig;

/// WGS84
const INPUT_SPATIAL_REFERENCE: &str = "4326";

/// Build the point-in-polygon query URL for one endpoint.
///
/// Any query parameters already present on the configured URL are kept.
pub fn containment_url(endpoint: &EndpointConfig, point: GeoPoint) -> Result<Url, QueryError> {
    let mut url = Url::parse(&endpoint.url).map_err(|e| {
        QueryError::Network(format!("invalid endpoint URL '{}': {}", endpoint.url, e))
    })?;

    url.query_pairs_mut()
        .append_pair("geometry", &format!("{},{}", point.lon(), point.lat()))
        .append_pair("geometryType", "esriGeometryPoint")
        .append_pair("inSR", INPUT_SPATIAL_REFERENCE)
        .append_pair("spatialRel", "esriSpatialRelIntersects")
        .append_pair("outFields", "*")
        .append_pair("where", &endpoint.filter)
        .append_pair("returnGeometry", "false")
        .append_pair("f", "json");

    Ok(url)
}

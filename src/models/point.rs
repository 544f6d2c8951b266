//! Input coordinates and the geocoder candidate they arrive in.

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Geographic point (WGS84 lat/lon), validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    #[serde(rename = "latitude")]
    lat: f64,
    #[serde(rename = "longitude")]
    lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting NaN and out-of-range coordinates
    pub fn new(lat: f64, lon: f64) -> Result<Self, ResolveError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        if !valid {
            return Err(ResolveError::InvalidPoint {
                latitude: lat,
                longitude: lon,
            });
        }

        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// A single result handed over by the upstream geocoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub latitude: f64,
    pub longitude: f64,

    /// County the geocoder believes the point is in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county_guess: Option<String>,

    /// Locality (city) the geocoder believes the point is in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality_guess: Option<String>,

    /// State/region code, e.g. "CA"
    pub region_code: String,
}

impl GeocodeCandidate {
    pub fn point(&self) -> Result<GeoPoint, ResolveError> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_point() {
        let p = GeoPoint::new(38.5823873, -121.493432).unwrap();
        assert_eq!(p.lat(), 38.5823873);
        assert_eq!(p.lon(), -121.493432);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_serializes_with_candidate_field_names() {
        let p = GeoPoint::new(38.58, -121.49).unwrap();
        assert_eq!(
            serde_json::to_value(p).unwrap(),
            serde_json::json!({"latitude": 38.58, "longitude": -121.49})
        );
    }

    #[test]
    fn test_candidate_deserializes_without_hints() {
        let candidate: GeocodeCandidate = serde_json::from_str(
            r#"{"latitude": 38.58, "longitude": -121.49, "region_code": "CA"}"#,
        )
        .unwrap();
        assert!(candidate.locality_guess.is_none());
        assert!(candidate.county_guess.is_none());
        assert!(candidate.point().is_ok());
    }
}

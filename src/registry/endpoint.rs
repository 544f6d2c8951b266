//! Boundary endpoint configuration and normalization of raw entries.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Filter predicate applied when an entry does not specify one
pub const DEFAULT_FILTER: &str = "1=1";

/// Attribute names scanned for a label when an entry does not specify any
pub const DEFAULT_FIELD_CANDIDATES: &[&str] = &["NAME", "CITY", "CITY_NAME"];

/// Canonical configuration for one boundary service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointConfig {
    /// Jurisdiction name (registry key)
    pub name: String,
    /// Absolute http(s) URL of the layer's query operation
    pub url: String,
    /// Boundary predicate (ArcGIS `where` clause)
    pub filter: String,
    /// Label used when a matched feature carries no usable name attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_label: Option<String>,
    /// Attribute names to read a label from, in priority order
    pub field_candidates: Vec<String>,
}

/// An entry as written in the jurisdiction document: either a bare URL or an
/// object carrying the URL plus optional settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Url(String),
    Structured(StructuredEntry),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructuredEntry {
    pub url: String,
    #[serde(default, alias = "where")]
    pub filter: Option<String>,
    #[serde(default, alias = "fallback_label")]
    pub fallback_name: Option<String>,
    #[serde(default, alias = "field_candidates")]
    pub fields: Option<Vec<String>>,
}

/// Normalize a raw entry into an [`EndpointConfig`].
///
/// Blank optional values collapse to their defaults, so a bare URL and an
/// object with only `url` and `filter: "1=1"` produce identical configs.
pub fn normalize(name: &str, raw: RawEntry) -> Result<EndpointConfig, ConfigError> {
    let (url, filter, fallback_label, fields) = match raw {
        RawEntry::Url(url) => (url, None, None, None),
        RawEntry::Structured(entry) => (entry.url, entry.filter, entry.fallback_name, entry.fields),
    };

    let url = validate_url(name, url.trim())?;

    let filter = filter
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    let fallback_label = fallback_label
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    let field_candidates: Vec<String> = fields
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    let field_candidates = if field_candidates.is_empty() {
        DEFAULT_FIELD_CANDIDATES
            .iter()
            .map(|f| f.to_string())
            .collect()
    } else {
        field_candidates
    };

    Ok(EndpointConfig {
        name: name.to_string(),
        url,
        filter,
        fallback_label,
        field_candidates,
    })
}

fn validate_url(name: &str, url: &str) -> Result<String, ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::EmptyUrl {
            name: name.to_string(),
        });
    }

    let invalid = |reason: String| ConfigError::InvalidUrl {
        name: name.to_string(),
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawEntry {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_bare_url_gets_defaults() {
        let config = normalize("Sacramento", raw(r#""https://gis.example.com/query""#)).unwrap();
        assert_eq!(config.name, "Sacramento");
        assert_eq!(config.url, "https://gis.example.com/query");
        assert_eq!(config.filter, "1=1");
        assert!(config.fallback_label.is_none());
        assert_eq!(config.field_candidates, vec!["NAME", "CITY", "CITY_NAME"]);
    }

    #[test]
    fn test_bare_and_structured_are_equivalent() {
        let bare = normalize("X", raw(r#""http://x/query""#)).unwrap();
        let structured =
            normalize("X", raw(r#"{"url": "http://x/query", "filter": "1=1"}"#)).unwrap();
        assert_eq!(bare, structured);
    }

    #[test]
    fn test_structured_entry() {
        let config = normalize(
            "Elk Grove",
            raw(r#"{
                "url": "https://gis.example.com/cities/query",
                "filter": "CITY_NAME = 'Elk Grove'",
                "fallback_name": "Elk Grove",
                "fields": ["JURISDICTION"]
            }"#),
        )
        .unwrap();
        assert_eq!(config.filter, "CITY_NAME = 'Elk Grove'");
        assert_eq!(config.fallback_label.as_deref(), Some("Elk Grove"));
        assert_eq!(config.field_candidates, vec!["JURISDICTION"]);
    }

    #[test]
    fn test_aliases() {
        let config = normalize(
            "Davis",
            raw(r#"{"url": "http://x/query", "where": "OBJECTID = 4", "fallback_label": "Davis"}"#),
        )
        .unwrap();
        assert_eq!(config.filter, "OBJECTID = 4");
        assert_eq!(config.fallback_label.as_deref(), Some("Davis"));
    }

    #[test]
    fn test_blank_optionals_fall_back_to_defaults() {
        let config = normalize(
            "X",
            raw(r#"{"url": "http://x/query", "filter": "  ", "fallback_name": "", "fields": [""]}"#),
        )
        .unwrap();
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert!(config.fallback_label.is_none());
        assert_eq!(config.field_candidates.len(), 3);
    }

    #[test]
    fn test_rejects_empty_url() {
        let err = normalize("X", raw(r#""   ""#)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyUrl { .. }));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = normalize("X", raw(r#""ftp://x/query""#)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = normalize("X", raw(r#""not a url""#)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}

//! Endpoint registry: the county and city boundary services, in the order
//! they appear in the jurisdiction document.

mod endpoint;

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::ConfigError;

pub use endpoint::{
    normalize, EndpointConfig, RawEntry, StructuredEntry, DEFAULT_FIELD_CANDIDATES, DEFAULT_FILTER,
};

const COUNTY_SECTIONS: &[&str] = &["COUNTY_ENDPOINTS", "counties"];
const CITY_SECTIONS: &[&str] = &["CITY_ENDPOINTS", "cities"];

/// Immutable, ordered county and city endpoint mappings.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    counties: Vec<EndpointConfig>,
    cities: Vec<EndpointConfig>,
}

impl Registry {
    pub fn new(counties: Vec<EndpointConfig>, cities: Vec<EndpointConfig>) -> Self {
        Self { counties, cities }
    }

    /// Load a registry from a jurisdiction document on disk
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let registry = Self::load(&content)?;
        info!(
            "Loaded {} county and {} city endpoints from {}",
            registry.counties.len(),
            registry.cities.len(),
            path.as_ref().display()
        );
        Ok(registry)
    }

    /// Parse a jurisdiction document.
    ///
    /// Missing sections are treated as empty. Key order is preserved.
    pub fn load(document: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(document)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let Value::Object(root) = value else {
            return Err(ConfigError::NotAnObject);
        };

        Ok(Self {
            counties: load_section(&root, COUNTY_SECTIONS)?,
            cities: load_section(&root, CITY_SECTIONS)?,
        })
    }

    /// County endpoints in document order
    pub fn counties(&self) -> &[EndpointConfig] {
        &self.counties
    }

    /// City endpoints in document order
    pub fn cities(&self) -> &[EndpointConfig] {
        &self.cities
    }

    /// Look up a city override entry by jurisdiction name.
    ///
    /// An exact key match wins over a case-insensitive one.
    pub fn city(&self, name: &str) -> Option<&EndpointConfig> {
        let name = name.trim();
        self.cities
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.cities.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
    }

    pub fn is_empty(&self) -> bool {
        self.counties.is_empty() && self.cities.is_empty()
    }
}

fn load_section(
    root: &Map<String, Value>,
    keys: &[&str],
) -> Result<Vec<EndpointConfig>, ConfigError> {
    let Some((key, section)) = keys
        .iter()
        .find_map(|k| root.get(*k).map(|section| (*k, section)))
    else {
        debug!("Section {} absent, treating as empty", keys[0]);
        return Ok(Vec::new());
    };

    let entries = match section {
        Value::Object(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(ConfigError::InvalidSection(key.to_string())),
    };

    entries
        .iter()
        .map(|(name, raw)| {
            let raw: RawEntry = serde_json::from_value(raw.clone())
                .map_err(|_| ConfigError::InvalidEntry { name: name.clone() })?;
            normalize(name, raw)
        })
        .collect()
}

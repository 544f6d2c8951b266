//! Settings file for the `resolve` and `server` binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::arcgis::ClientSettings;
use crate::resolver::{CityFallback, ResolverOptions, SearchStrategy};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Sequential,
    Concurrent,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Jurisdiction document (county/city endpoint mappings)
    pub endpoints: PathBuf,
    pub region: String,
    pub strategy: StrategyKind,
    pub max_in_flight: usize,
    pub city_without_county: bool,
    pub city_fallback: CityFallback,
    pub diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoints: PathBuf::from("ca_city_endpoints.json"),
            region: "CA".to_string(),
            strategy: StrategyKind::Sequential,
            max_in_flight: 4,
            city_without_county: false,
            city_fallback: CityFallback::WithinCounty,
            diagnostics: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub retries: u32,
    pub retry_backoff_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            retries: 0,
            retry_backoff_ms: 500,
            user_agent: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load the file if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        let strategy = match self.engine.strategy {
            StrategyKind::Sequential => SearchStrategy::Sequential,
            StrategyKind::Concurrent => SearchStrategy::Concurrent {
                max_in_flight: self.engine.max_in_flight,
            },
        };

        ResolverOptions {
            expected_region: self.engine.region.clone(),
            strategy,
            city_without_county: self.engine.city_without_county,
            city_fallback: self.engine.city_fallback,
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        let mut settings = ClientSettings {
            timeout: Duration::from_secs(self.http.timeout_secs),
            retries: self.http.retries,
            retry_backoff: Duration::from_millis(self.http.retry_backoff_ms),
            ..ClientSettings::default()
        };
        if let Some(agent) = &self.http.user_agent {
            settings.user_agent = agent.clone();
        }
        settings
    }
}

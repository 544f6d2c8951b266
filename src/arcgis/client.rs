//! reqwest-backed boundary service client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::{classify, containment_url, BoundaryQuery, Exchange, Probe, QueryOutcome};
use crate::error::QueryError;
use crate::models::GeoPoint;
use crate::registry::EndpointConfig;

/// HTTP behaviour for boundary queries
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Bound on each attempt, including reading the body
    pub timeout: Duration,
    /// Extra attempts after a transient failure (0 = single attempt)
    pub retries: u32,
    pub retry_backoff: Duration,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 0,
            retry_backoff: Duration::from_millis(500),
            user_agent: concat!("civitas/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Queries ArcGIS REST `query` operations over HTTP
#[derive(Clone)]
pub struct ArcGisClient {
    client: Client,
    settings: ClientSettings,
}

impl ArcGisClient {
    pub fn new(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    async fn fetch(&self, url: &Url, exchange: &mut Exchange) -> Result<String, QueryError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        exchange.status = Some(status.as_u16());

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport(e))?;

        if !status.is_success() {
            exchange.body = Some(body);
            return Err(QueryError::HttpStatus(status.as_u16()));
        }

        Ok(body)
    }

    fn classify_transport(&self, err: reqwest::Error) -> QueryError {
        if err.is_timeout() {
            QueryError::Timeout(self.settings.timeout)
        } else {
            QueryError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl BoundaryQuery for ArcGisClient {
    async fn query(&self, endpoint: &EndpointConfig, point: GeoPoint) -> Probe {
        let start = Instant::now();

        let url = match containment_url(endpoint, point) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping {}: {}", endpoint.name, e);
                let mut exchange = Exchange::new(endpoint.url.clone());
                exchange.error = Some(e.to_string());
                return Probe {
                    outcome: QueryOutcome::Failed(e),
                    exchange,
                };
            }
        };

        let mut exchange = Exchange::new(url.as_str());
        let max_attempts = self.settings.retries + 1;

        let outcome = loop {
            exchange.attempts += 1;
            debug!(
                "Querying {} at ({}, {}) (attempt {}/{})",
                endpoint.name,
                point.lat(),
                point.lon(),
                exchange.attempts,
                max_attempts
            );

            match self.fetch(&url, &mut exchange).await {
                Ok(body) => {
                    let outcome = classify(&body, endpoint);
                    exchange.body = Some(body);
                    break outcome;
                }
                Err(e) if e.is_transient() && exchange.attempts < max_attempts => {
                    warn!(
                        "Query to {} failed (attempt {}/{}): {}",
                        endpoint.name, exchange.attempts, max_attempts, e
                    );
                    tokio::time::sleep(self.settings.retry_backoff).await;
                }
                Err(e) => break QueryOutcome::Failed(e),
            }
        };

        if let QueryOutcome::Failed(e) = &outcome {
            warn!("Query to {} failed: {}", endpoint.name, e);
            exchange.error = Some(e.to_string());
        }

        exchange.elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(
            "{} answered {:?} in {}ms",
            endpoint.name, outcome, exchange.elapsed_ms
        );

        Probe { outcome, exchange }
    }
}

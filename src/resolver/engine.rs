//! Resolver state machine.
//!
//! 1. County search: query county endpoints in registry order; the first
//!    match decides the county. No match means the result is unavailable and
//!    (by default) no city lookup happens.
//! 2. City override: if the locality hint names a city endpoint, query it; a
//!    match supersedes the generic city label.
//! 3. City fallback: otherwise derive a city label from the county.
//!
//! Endpoint failures count as "no match" and are never surfaced.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info};

use super::options::{CityFallback, ResolverOptions};
use crate::arcgis::{BoundaryQuery, Probe, QueryOutcome, UNNAMED_BOUNDARY};
use crate::diagnostics::{Diagnostics, Phase};
use crate::error::ResolveError;
use crate::models::{
    GeoPoint, GeocodeCandidate, Provenance, ResolutionResult, BOUNDARY_UNAVAILABLE,
};
use crate::registry::{EndpointConfig, Registry};

pub struct Resolver<Q> {
    registry: Registry,
    client: Q,
    options: ResolverOptions,
}

impl<Q: BoundaryQuery> Resolver<Q> {
    pub fn new(registry: Registry, client: Q, options: ResolverOptions) -> Self {
        Self {
            registry,
            client,
            options,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve a geocoder candidate, rejecting other regions and invalid
    /// coordinates before any endpoint is queried.
    pub async fn resolve_candidate(
        &self,
        candidate: &GeocodeCandidate,
        diagnostics: &Diagnostics,
    ) -> Result<ResolutionResult, ResolveError> {
        self.check_region(&candidate.region_code)?;
        let point = candidate.point()?;

        Ok(self
            .resolve_with_diagnostics(
                point,
                candidate.locality_guess.as_deref(),
                candidate.county_guess.as_deref(),
                diagnostics,
            )
            .await)
    }

    pub fn check_region(&self, region_code: &str) -> Result<(), ResolveError> {
        let expected = self.options.expected_region.trim();
        if region_code.trim().eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(ResolveError::OutOfRegion {
                expected: expected.to_string(),
                found: region_code.to_string(),
            })
        }
    }

    /// Resolve a point against the registry.
    ///
    /// `locality_hint` selects a city override entry by registry key: an
    /// exact match first, then an ASCII case-insensitive one (both trimmed).
    /// `county_hint` is advisory and never changes the search order.
    pub async fn resolve(
        &self,
        point: GeoPoint,
        locality_hint: Option<&str>,
        county_hint: Option<&str>,
    ) -> ResolutionResult {
        self.resolve_with_diagnostics(point, locality_hint, county_hint, &Diagnostics::disabled())
            .await
    }

    pub async fn resolve_with_diagnostics(
        &self,
        point: GeoPoint,
        locality_hint: Option<&str>,
        county_hint: Option<&str>,
        diagnostics: &Diagnostics,
    ) -> ResolutionResult {
        let Some(county) = self.search_counties(point, diagnostics).await else {
            if self.options.city_without_county {
                if let Some(city) = self.city_override(point, locality_hint, diagnostics).await {
                    info!("No county matched; city override gave {}", city);
                    return ResolutionResult {
                        county: BOUNDARY_UNAVAILABLE.to_string(),
                        city,
                        provenance: Provenance::CityOverride,
                    };
                }
            }

            info!(
                "No authoritative boundary for ({}, {})",
                point.lat(),
                point.lon()
            );
            return ResolutionResult::unavailable();
        };

        if let Some(hint) = county_hint {
            if !hint.trim().eq_ignore_ascii_case(&county) {
                debug!("County hint '{}' differs from resolved county '{}'", hint, county);
            }
        }

        if let Some(city) = self.city_override(point, locality_hint, diagnostics).await {
            return ResolutionResult {
                county,
                city,
                provenance: Provenance::CityOverride,
            };
        }

        let (city, provenance) = match self.options.city_fallback {
            CityFallback::WithinCounty => (
                format!("Valid (within {})", county),
                Provenance::CountyEndpoint,
            ),
            CityFallback::Unincorporated => {
                (format!("Unincorporated {}", county), Provenance::CountyEndpoint)
            }
            CityFallback::None => (BOUNDARY_UNAVAILABLE.to_string(), Provenance::CountyOnly),
        };

        ResolutionResult {
            county,
            city,
            provenance,
        }
    }

    /// Label of the earliest county entry (registry order) containing the point.
    ///
    /// Up to `width` queries run at once. Every query that completes is
    /// recorded, but outcomes are settled strictly in registry order, so a
    /// later entry answering first never wins. Returning drops (cancels)
    /// whatever is still in flight.
    async fn search_counties(&self, point: GeoPoint, diagnostics: &Diagnostics) -> Option<String> {
        let counties = self.registry.counties();
        let width = self.options.strategy.width();
        debug!(
            "Searching {} county endpoints ({:?})",
            counties.len(),
            self.options.strategy
        );

        let mut pending = counties.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut settled: Vec<Option<QueryOutcome>> = vec![None; counties.len()];
        let mut next = 0;

        loop {
            while in_flight.len() < width {
                match pending.next() {
                    Some((index, endpoint)) => {
                        in_flight.push(self.query_county(index, endpoint, point))
                    }
                    None => break,
                }
            }

            let Some((index, probe)) = in_flight.next().await else {
                return None;
            };
            diagnostics.record(Phase::County, &counties[index], probe.exchange);
            settled[index] = Some(probe.outcome);

            while let Some(Some(outcome)) = settled.get_mut(next).map(Option::take) {
                let endpoint = &counties[next];
                if let QueryOutcome::Matched(label) = outcome {
                    let county = display_label(endpoint, label);
                    debug!("County matched via {}: {}", endpoint.name, county);
                    return Some(county);
                }
                next += 1;
            }
        }
    }

    fn query_county<'a>(
        &'a self,
        index: usize,
        endpoint: &'a EndpointConfig,
        point: GeoPoint,
    ) -> BoxFuture<'a, (usize, Probe)> {
        async move { (index, self.client.query(endpoint, point).await) }.boxed()
    }

    /// Query the city entry named by the locality hint, if there is one
    async fn city_override(
        &self,
        point: GeoPoint,
        locality_hint: Option<&str>,
        diagnostics: &Diagnostics,
    ) -> Option<String> {
        let hint = locality_hint.map(str::trim).filter(|h| !h.is_empty())?;
        let Some(endpoint) = self.registry.city(hint) else {
            debug!("No city override entry for '{}'", hint);
            return None;
        };

        let probe = self.client.query(endpoint, point).await;
        diagnostics.record(Phase::City, endpoint, probe.exchange);

        match probe.outcome {
            QueryOutcome::Matched(label) => {
                let city = display_label(endpoint, label);
                debug!("City override matched via {}: {}", endpoint.name, city);
                Some(city)
            }
            _ => None,
        }
    }
}

/// Unnamed matches are labelled with the registry key.
fn display_label(endpoint: &EndpointConfig, label: String) -> String {
    if label == UNNAMED_BOUNDARY {
        endpoint.name.clone()
    } else {
        label
    }
}

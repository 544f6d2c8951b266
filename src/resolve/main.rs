//! One-shot jurisdiction lookup.
//!
//! Takes a geocoded point (plus the geocoder's locality/county guesses),
//! resolves it against the configured boundary services and prints the
//! result as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use civitas::config::{Config, StrategyKind};
use civitas::diagnostics::DiagnosticRecord;
use civitas::{ArcGisClient, Diagnostics, GeocodeCandidate, Registry, ResolutionResult, Resolver};

#[derive(Parser, Debug)]
#[command(name = "resolve")]
#[command(about = "Resolve a point to its authoritative county and city")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Jurisdiction endpoint document (overrides the settings file)
    #[arg(short, long)]
    endpoints: Option<PathBuf>,

    /// Latitude (WGS84)
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude (WGS84)
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Region code reported by the geocoder (defaults to the configured region)
    #[arg(long)]
    region: Option<String>,

    /// Locality reported by the geocoder
    #[arg(long)]
    locality: Option<String>,

    /// County reported by the geocoder
    #[arg(long)]
    county: Option<String>,

    /// Query county endpoints concurrently
    #[arg(long)]
    concurrent: bool,

    /// Include raw request/response records in the output
    #[arg(long)]
    diagnostics: bool,
}

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    result: ResolutionResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<DiagnosticRecord>,
}

/// Geocoder candidate for the command line; without `--region` the point is
/// assumed to lie in the configured region.
fn candidate(args: Args, config: &Config) -> GeocodeCandidate {
    GeocodeCandidate {
        latitude: args.lat,
        longitude: args.lon,
        county_guess: args.county,
        locality_guess: args.locality,
        region_code: args
            .region
            .unwrap_or_else(|| config.engine.region.clone()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(endpoints) = &args.endpoints {
        config.engine.endpoints = endpoints.clone();
    }
    if args.concurrent {
        config.engine.strategy = StrategyKind::Concurrent;
    }
    if args.diagnostics {
        config.engine.diagnostics = true;
    }

    let registry = Registry::load_from_file(&config.engine.endpoints).with_context(|| {
        format!(
            "Failed to load endpoints from {}",
            config.engine.endpoints.display()
        )
    })?;

    let client =
        ArcGisClient::new(config.client_settings()).context("Failed to create HTTP client")?;
    let resolver = Resolver::new(registry, client, config.resolver_options());

    let (lat, lon) = (args.lat, args.lon);
    let candidate = candidate(args, &config);

    let diagnostics = Diagnostics::new(config.engine.diagnostics);
    let result = resolver.resolve_candidate(&candidate, &diagnostics).await?;

    info!(
        "Resolved ({}, {}) -> {} / {} ({})",
        lat, lon, result.county, result.city, result.provenance
    );

    let output = Output {
        result,
        diagnostics: diagnostics.into_records(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["resolve", "--lat", "38.58", "--lon", "-121.49"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_region_defaults_to_configured_region() {
        let mut config = Config::default();
        config.engine.region = "NV".to_string();

        let candidate = candidate(args(&[]), &config);
        assert_eq!(candidate.region_code, "NV");
        assert_eq!(candidate.longitude, -121.49);
    }

    #[test]
    fn test_region_flag_overrides_config() {
        let args = args(&["--region", "OR", "--locality", "Bend"]);
        let candidate = candidate(args, &Config::default());
        assert_eq!(candidate.region_code, "OR");
        assert_eq!(candidate.locality_guess.as_deref(), Some("Bend"));
    }
}

//! Jurisdiction resolution server.
//!
//! Exposes the resolver over HTTP for callers that already hold a geocoded
//! point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use civitas::api::{build_router, AppState};
use civitas::config::Config;
use civitas::{ArcGisClient, Registry, Resolver};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Jurisdiction resolution server")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Jurisdiction endpoint document (overrides the settings file)
    #[arg(short, long)]
    endpoints: Option<PathBuf>,

    /// Listen address (overrides the settings file)
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(endpoints) = args.endpoints {
        config.engine.endpoints = endpoints;
    }
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }

    info!("Civitas Jurisdiction Server");

    let registry = Registry::load_from_file(&config.engine.endpoints).with_context(|| {
        format!(
            "Failed to load endpoints from {}",
            config.engine.endpoints.display()
        )
    })?;

    let client =
        ArcGisClient::new(config.client_settings()).context("Failed to create HTTP client")?;

    let app = build_router(Arc::new(AppState {
        resolver: Resolver::new(registry, client, config.resolver_options()),
        diagnostics_enabled: config.engine.diagnostics,
    }));

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

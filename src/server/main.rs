//! HTTP server for area search, feature search and CSV export.
//!
//! Area lookups go to Nominatim, feature queries to Overpass; results are
//! filtered to the area boundary before they are returned.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use locator::api::{router, AppState};
use locator::features::{FeatureSearch, OverpassClient};
use locator::geocoding::{BoundaryResolver, NominatimClient};

mod config;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Point-of-interest locator server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Nominatim base URL (overrides config)
    #[arg(long)]
    nominatim_url: Option<String>,

    /// Overpass interpreter URL (overrides config)
    #[arg(long)]
    overpass_url: Option<String>,

    /// Log level: trace, debug, info, warn or error (overrides config)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(listen) = self.listen {
            config.server.listen = listen;
        }
        if let Some(url) = self.nominatim_url {
            config.upstream.nominatim_url = url;
        }
        if let Some(url) = self.overpass_url {
            config.upstream.overpass_url = url;
        }
        if let Some(level) = self.log_level {
            config.server.log_level = level;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;

    // Initialize logging
    let level: Level = config
        .server
        .log_level
        .parse()
        .with_context(|| format!("Invalid log level '{}'", config.server.log_level))?;
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Locator Server");
    info!("Geocoder: {}", config.upstream.nominatim_url);
    info!("Feature database: {}", config.upstream.overpass_url);

    let upstream = &config.upstream;
    let geocoder = NominatimClient::new(
        &upstream.nominatim_url,
        &upstream.user_agent,
        upstream.timeout(),
    )?;
    let overpass = OverpassClient::new(
        &upstream.overpass_url,
        &upstream.user_agent,
        upstream.timeout(),
    )?;

    let state = Arc::new(AppState {
        resolver: BoundaryResolver::new(Arc::new(geocoder))
            .with_buffer(config.buffer.radius_m, config.buffer.vertices),
        features: FeatureSearch::new(Arc::new(overpass)),
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

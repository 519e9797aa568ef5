//! Meteocraft server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `meteocraft-config.yaml` (or `METEOCRAFT_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the population raster
//! 4. Build the scenario resolver (presets, SBDB lookup, fallback)
//! 5. Serve HTTP until `Ctrl-C`

use std::path::PathBuf;
use std::sync::Arc;

use meteocraft_exposure::GeoTiffRaster;
use meteocraft_sbdb::{AsteroidLookup, PresetCatalog, SbdbClient, ScenarioResolver};
use meteocraft_server::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use meteocraft_server::{AppState, MeteocraftConfig, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the raster cannot be
/// opened, or the server fails to bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = MeteocraftConfig::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config = %config_path.display(),
        found = config_path.exists(),
        host = config.server.host,
        port = config.server.port,
        sbdb_url = config.sbdb.api_url,
        sbdb_timeout_ms = config.sbdb.timeout_ms,
        "configuration loaded"
    );

    let raster = GeoTiffRaster::open(&config.raster.path)?;

    let lookup = if config.sbdb.is_enabled() {
        AsteroidLookup::Sbdb(SbdbClient::new(
            config.sbdb.api_url.clone(),
            config.sbdb.timeout(),
        )?)
    } else {
        warn!("SBDB lookups disabled, non-preset names use the fallback scenario");
        AsteroidLookup::Disabled
    };
    let resolver = ScenarioResolver::new(PresetCatalog::default(), lookup);

    let state = Arc::new(AppState::new(
        resolver,
        Arc::new(raster),
        config.assets.static_dir.clone(),
    )?);

    start_server(&config.server, state).await?;

    info!("meteocraft-server shutdown complete");
    Ok(())
}

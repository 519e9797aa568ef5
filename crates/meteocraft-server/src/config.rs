//! Configuration loading and typed config structures for the server.
//!
//! The configuration lives in `meteocraft-config.yaml` at the project
//! root (or wherever `METEOCRAFT_CONFIG` points). Every field has a
//! default, so a missing file or section is not an error.
//!
//! Environment variables override YAML values:
//! - `SBDB_API_URL` overrides `sbdb.api_url` (empty disables lookups)
//! - `RASTER_PATH` overrides `raster.path`
//! - `STATIC_DIR` overrides `assets.static_dir`
//! - `PORT` overrides `server.port`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::server::ServerConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "METEOCRAFT_CONFIG";

/// Config file used when `METEOCRAFT_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "meteocraft-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration, mirroring `meteocraft-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MeteocraftConfig {
    /// Bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Asteroid lookup endpoint.
    #[serde(default)]
    pub sbdb: SbdbConfig,

    /// Population raster location.
    #[serde(default)]
    pub raster: RasterConfig,

    /// Front-end asset directory.
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MeteocraftConfig {
    /// Load `path` if it exists (defaults otherwise), then apply the
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, and
    /// [`ConfigError::InvalidEnv`] if an override does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, without overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides read through `var` (normally the process environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `PORT` is not a valid port.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("SBDB_API_URL") {
            self.sbdb.api_url = val;
        }
        if let Some(val) = var("RASTER_PATH") {
            self.raster.path = PathBuf::from(val);
        }
        if let Some(val) = var("STATIC_DIR") {
            self.assets.static_dir = PathBuf::from(val);
        }
        if let Some(val) = var("PORT") {
            self.server.port = val
                .trim()
                .parse()
                .ok()
                .ok_or_else(|| ConfigError::InvalidEnv {
                    name: "PORT",
                    value: val.clone(),
                })?;
        }
        Ok(())
    }
}

/// Small-Body Database lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SbdbConfig {
    /// API endpoint; empty disables external lookups.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SbdbConfig {
    /// The request timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whether lookups are enabled.
    pub fn is_enabled(&self) -> bool {
        !self.api_url.trim().is_empty()
    }
}

impl Default for SbdbConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Population raster settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RasterConfig {
    /// Path to the population-density GeoTIFF.
    #[serde(default = "default_raster_path")]
    pub path: PathBuf,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            path: default_raster_path(),
        }
    }
}

/// Static asset settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetsConfig {
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `meteocraft_sbdb=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_api_url() -> String {
    String::from("https://ssd-api.jpl.nasa.gov/sbdb.api")
}

const fn default_timeout_ms() -> u64 {
    10_000
}

fn default_raster_path() -> PathBuf {
    PathBuf::from("static/gpw_v4_population_density_rev11_2020_30_sec.tif")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_log_level() -> String {
    String::from("info")
}

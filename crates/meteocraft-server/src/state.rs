//! Shared application state for the HTTP server.
//!
//! [`AppState`] is built once at startup and shared read-only by every
//! request. The raster handle lives here for the whole process and is
//! dropped on shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use meteocraft_exposure::PopulationRaster;
use meteocraft_sbdb::ScenarioResolver;

use crate::pages::Pages;

/// Top-level shared state, wrapped in `Arc` for Axum.
pub struct AppState {
    /// Name-to-scenario resolution.
    pub resolver: ScenarioResolver,
    /// The population-density raster.
    pub raster: Arc<dyn PopulationRaster>,
    /// Compiled page templates.
    pub pages: Pages,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Assemble the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in page templates fail to compile.
    pub fn new(
        resolver: ScenarioResolver,
        raster: Arc<dyn PopulationRaster>,
        static_dir: impl Into<PathBuf>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            resolver,
            raster,
            pages: Pages::new()?,
            static_dir: static_dir.into(),
        })
    }
}

impl core::fmt::Debug for AppState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppState")
            .field("resolver", &self.resolver)
            .field("raster", self.raster.info())
            .field("static_dir", &self.static_dir)
            .finish_non_exhaustive()
    }
}

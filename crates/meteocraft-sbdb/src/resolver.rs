//! Name-to-scenario resolution.
//!
//! Presets answer first, then the SBDB lookup, then the fallback. The
//! lookup is an enum rather than a trait object so the async `fetch`
//! stays dyn-free.

use meteocraft_types::{DEFAULT_ASTEROID_NAME, ImpactScenario};
use tracing::{info, warn};

use crate::client::SbdbClient;
use crate::error::SbdbError;
use crate::presets::{PresetCatalog, fallback_scenario};
use crate::record::scenario_from_record;

/// The name a request asks for: trimmed, or the default when absent or blank.
pub fn requested_name(name: Option<&str>) -> &str {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_ASTEROID_NAME)
}

/// Source of asteroid records.
#[derive(Debug, Clone)]
pub enum AsteroidLookup {
    /// Query the JPL Small-Body Database.
    Sbdb(SbdbClient),
    /// No lookup configured; every non-preset name falls back.
    Disabled,
}

impl AsteroidLookup {
    /// Fetch the raw record for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SbdbError::NotConfigured`] when disabled, otherwise
    /// whatever the client reports.
    pub async fn fetch(&self, name: &str) -> Result<serde_json::Value, SbdbError> {
        match self {
            Self::Sbdb(client) => client.fetch(name).await,
            Self::Disabled => Err(SbdbError::NotConfigured),
        }
    }

    /// Human-readable name for logging.
    pub fn name(&self) -> &str {
        match self {
            Self::Sbdb(client) => client.api_url(),
            Self::Disabled => "disabled",
        }
    }
}

/// Turns an asteroid name into an [`ImpactScenario`]. Never fails.
#[derive(Debug, Clone)]
pub struct ScenarioResolver {
    presets: PresetCatalog,
    lookup: AsteroidLookup,
}

impl ScenarioResolver {
    /// Resolver over the given presets and lookup.
    pub const fn new(presets: PresetCatalog, lookup: AsteroidLookup) -> Self {
        Self { presets, lookup }
    }

    /// The preset catalogue.
    pub const fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    /// Resolve `name` to a scenario.
    pub async fn resolve(&self, name: &str) -> ImpactScenario {
        if let Some(preset) = self.presets.lookup(name) {
            info!(asteroid = name, "Using preset scenario");
            return preset.scenario();
        }

        match self.lookup_record(name).await {
            Ok(scenario) => {
                info!(
                    asteroid = name,
                    diameter = %scenario.diameter,
                    energy_mt = scenario.energy_megatons,
                    "Resolved scenario from SBDB"
                );
                scenario
            }
            Err(e) => {
                warn!(
                    asteroid = name,
                    lookup = self.lookup.name(),
                    error = %e,
                    "Asteroid lookup failed, using fallback scenario"
                );
                fallback_scenario(name)
            }
        }
    }

    async fn lookup_record(&self, name: &str) -> Result<ImpactScenario, SbdbError> {
        let record = self.lookup.fetch(name).await?;
        scenario_from_record(name, &record)
    }
}

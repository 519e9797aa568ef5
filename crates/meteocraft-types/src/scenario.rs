//! The impact scenario: physical parameters resolved once per request.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Asteroid name used when a request does not name one.
pub const DEFAULT_ASTEROID_NAME: &str = "Impactor 2025";

/// Which resolution path produced a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSource {
    /// A fixed literal preset from the built-in catalogue.
    Preset,
    /// Extracted from a Small-Body Database lookup.
    Sbdb,
    /// The default scenario substituted after a failed lookup.
    Fallback,
}

/// Physical parameters of a (hypothetical) impactor.
///
/// `diameter` and `impact_velocity` keep the textual form they were
/// resolved in (for example `".5 km"` and `"20 km/s"`); the physics crate
/// parses the leading number of each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ImpactScenario {
    /// Name the scenario was resolved for.
    pub asteroid_name: String,
    /// Diameter with unit, e.g. `".8 km"`.
    pub diameter: String,
    /// Earth-relative velocity with unit, e.g. `"15 km/s"`.
    pub impact_velocity: String,
    /// Mean impact probability across virtual impactors.
    pub impact_probability: f64,
    /// Mean impact energy in megatons of TNT.
    pub energy_megatons: f64,
    /// Mean impactor mass in kilograms.
    pub mass_kg: f64,
    /// Dates of the listed virtual-impactor records.
    pub candidate_impact_dates: Vec<String>,
    /// Resolution path.
    pub source: ScenarioSource,
}

//! Built-in scenarios: the preset catalogue and the fallback.

use meteocraft_types::{DEFAULT_ASTEROID_NAME, ImpactScenario, ScenarioSource};

/// A fixed scenario served without any lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    /// Name that selects the preset (exact match).
    pub name: &'static str,
    /// Diameter with unit.
    pub diameter: &'static str,
    /// Velocity with unit.
    pub impact_velocity: &'static str,
    /// Impact probability.
    pub impact_probability: f64,
    /// Energy in megatons.
    pub energy_megatons: f64,
    /// Mass in kilograms.
    pub mass_kg: f64,
    /// Candidate impact dates.
    pub candidate_impact_dates: &'static [&'static str],
}

impl Preset {
    /// Materialize the preset as a scenario.
    pub fn scenario(&self) -> ImpactScenario {
        ImpactScenario {
            asteroid_name: self.name.to_owned(),
            diameter: self.diameter.to_owned(),
            impact_velocity: self.impact_velocity.to_owned(),
            impact_probability: self.impact_probability,
            energy_megatons: self.energy_megatons,
            mass_kg: self.mass_kg,
            candidate_impact_dates: self
                .candidate_impact_dates
                .iter()
                .map(|d| (*d).to_owned())
                .collect(),
            source: ScenarioSource::Preset,
        }
    }
}

/// The hypothetical impactor the simulator opens with.
const IMPACTOR_2025: Preset = Preset {
    name: DEFAULT_ASTEROID_NAME,
    diameter: ".8 km",
    impact_velocity: "15 km/s",
    impact_probability: 0.02,
    energy_megatons: 21_600.0,
    mass_kg: 8.04e11,
    candidate_impact_dates: &["2025-10-04", "2025-10-06"],
};

/// Lookup table of presets.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    /// Catalogue with the given presets.
    pub const fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// The preset matching `name` exactly, if any.
    pub fn lookup(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Names of all presets.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.iter().map(|p| p.name)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::new(vec![IMPACTOR_2025])
    }
}

/// Scenario substituted whenever a lookup fails.
pub fn fallback_scenario(name: &str) -> ImpactScenario {
    ImpactScenario {
        asteroid_name: name.to_owned(),
        diameter: String::from(".5 km"),
        impact_velocity: String::from("20 km/s"),
        impact_probability: 0.0,
        energy_megatons: 1000.0,
        mass_kg: 1e11,
        candidate_impact_dates: Vec::new(),
        source: ScenarioSource::Fallback,
    }
}

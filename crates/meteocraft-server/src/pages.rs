//! HTML pages rendered with `minijinja`.
//!
//! Templates are compiled into the binary; the front-end script they load
//! is served from the static directory.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::SimulateError;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const SIMULATOR_TEMPLATE: &str = include_str!("../templates/meteorito.html");

/// Placeholder shown before a scenario is loaded.
const NOT_AVAILABLE: &str = "No disponible";

/// Names suggested in the simulator's asteroid picker besides the presets.
const SUGGESTED_ASTEROIDS: &[&str] = &["Apophis", "Bennu", "Didymos"];

/// Values shown in the simulator's result table on first load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorPage {
    /// First candidate impact date.
    pub first_date: String,
    /// Second candidate impact date.
    pub second_date: String,
    /// Energy in megatons.
    pub energy_megatons: f64,
    /// Impactor diameter.
    pub diameter: String,
    /// Crater diameter in km.
    pub crater_km: f64,
    /// Impact probability.
    pub probability: f64,
    /// Velocity in km/s.
    pub velocity: f64,
    /// Shockwave radius in km.
    pub shockwave_km: f64,
    /// Earthquake magnitude.
    pub magnitude: f64,
    /// Thermal radius in km.
    pub thermal_km: f64,
    /// Exposed population.
    pub population: u64,
}

impl Default for SimulatorPage {
    fn default() -> Self {
        Self {
            first_date: NOT_AVAILABLE.to_owned(),
            second_date: NOT_AVAILABLE.to_owned(),
            energy_megatons: 0.0,
            diameter: NOT_AVAILABLE.to_owned(),
            crater_km: 0.0,
            probability: 0.0,
            velocity: 0.0,
            shockwave_km: 0.0,
            magnitude: 0.0,
            thermal_km: 0.0,
            population: 0,
        }
    }
}

/// The compiled page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl core::fmt::Debug for Pages {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pages").finish_non_exhaustive()
    }
}

impl Pages {
    /// Compile the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns the template syntax error, if any.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("meteorito.html", SIMULATOR_TEMPLATE)?;
        Ok(Self { env })
    }

    /// The landing page.
    pub fn index(&self) -> Result<String, SimulateError> {
        Ok(self.env.get_template("index.html")?.render(context! {})?)
    }

    /// The simulator page, offering `presets` first in the asteroid picker.
    pub fn simulator<'a>(
        &self,
        page: &SimulatorPage,
        presets: impl Iterator<Item = &'a str>,
    ) -> Result<String, SimulateError> {
        let mut asteroids: Vec<&str> = presets.collect();
        asteroids.extend_from_slice(SUGGESTED_ASTEROIDS);
        Ok(self
            .env
            .get_template("meteorito.html")?
            .render(context! { page => page, asteroids => asteroids })?)
    }
}

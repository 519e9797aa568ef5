//! Request and response payloads for `POST /simulate`.
//!
//! Field names are the contract with the browser client and are kept
//! verbatim.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::report::{DerivedPhysics, ExposureResult};

/// Body of `POST /simulate`.
///
/// Coordinates are optional at this level so a missing value can be
/// answered with the dedicated error payload instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulateRequest {
    /// Impact latitude in degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Impact longitude in degrees.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Asteroid to simulate; the default impactor when absent.
    #[serde(default)]
    pub asteroid_name: Option<String>,
}

/// Successful `POST /simulate` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulateResponse {
    /// Impactor diameter in meters.
    pub diameter_m: f64,
    /// Impact energy in megatons of TNT.
    pub energy_megatons: f64,
    /// Crater diameter in kilometres.
    pub crater_diameter_km: f64,
    /// Thermal radiation radius in kilometres.
    pub thermal_radius_km: f64,
    /// Shockwave radius in kilometres.
    pub shockwave_radius_km: f64,
    /// Equivalent earthquake magnitude.
    pub earthquake_magnitude: f64,
    /// Population inside the thermal footprint.
    #[ts(type = "number")]
    pub population_density: u64,
}

impl SimulateResponse {
    /// Assemble the response from the computed parts.
    pub const fn new(
        diameter_m: f64,
        energy_megatons: f64,
        physics: &DerivedPhysics,
        exposure: &ExposureResult,
    ) -> Self {
        Self {
            diameter_m,
            energy_megatons,
            crater_diameter_km: physics.crater_diameter_km,
            thermal_radius_km: physics.thermal_radius_km,
            shockwave_radius_km: physics.shockwave_radius_km,
            earthquake_magnitude: physics.seismic_magnitude,
            population_density: exposure.population_total,
        }
    }
}

//! Results computed per request from a scenario and an impact point.

use serde::{Deserialize, Serialize};

/// Quantities derived from the impact energy and diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPhysics {
    /// Impact energy in joules.
    pub energy_joules: f64,
    /// Final crater diameter in kilometres.
    pub crater_diameter_km: f64,
    /// Blast scaling coefficient (9 for impactors over 1 km, else 3.5).
    pub shockwave_coefficient: f64,
    /// Shockwave radius in kilometres.
    pub shockwave_radius_km: f64,
    /// Equivalent earthquake magnitude.
    pub seismic_magnitude: f64,
    /// Thermal radiation radius in kilometres.
    pub thermal_radius_km: f64,
}

/// Population exposed inside the impact footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureResult {
    /// Rounded sum of the raster values inside the footprint.
    pub population_total: u64,
    /// Number of valid (non no-data) cells that contributed.
    pub cells_counted: u64,
    /// Footprint radius in whole meters.
    pub footprint_radius_m: u64,
}

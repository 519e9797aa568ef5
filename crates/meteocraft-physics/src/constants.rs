//! Scaling constants for the impact formulas.

/// Joules released per megaton of TNT.
pub const JOULES_PER_MEGATON: f64 = 4.184e15;

/// Target density term of the crater scaling law (kg/m^3).
pub const TARGET_DENSITY: f64 = 2500.0;

/// Crater scaling prefactor.
pub const CRATER_COEFFICIENT: f64 = 0.7;

/// Crater scaling exponent (5/17).
pub const CRATER_EXPONENT: f64 = 5.0 / 17.0;

/// Shockwave coefficient for impactors larger than [`LARGE_IMPACTOR_DIAMETER_M`].
pub const LARGE_SHOCKWAVE_COEFFICIENT: f64 = 9.0;

/// Shockwave coefficient for all other impactors.
pub const SMALL_SHOCKWAVE_COEFFICIENT: f64 = 3.5;

/// Diameter threshold (strictly greater than) for the large coefficient.
pub const LARGE_IMPACTOR_DIAMETER_M: f64 = 1000.0;

/// Slope of the energy-magnitude relation.
pub const SEISMIC_SLOPE: f64 = 0.67;

/// Offset of the energy-magnitude relation.
pub const SEISMIC_OFFSET: f64 = 5.87;

/// Thermal radius per square-root megaton (km).
pub const THERMAL_COEFFICIENT: f64 = 3.0;

/// Meters per kilometre.
pub const METERS_PER_KM: f64 = 1000.0;

//! Impact physics formulas.
//!
//! Units: energy in megatons of TNT, diameters in meters, velocities in
//! km/s, radii in kilometres.

use meteocraft_types::{DerivedPhysics, ImpactScenario};

use crate::constants::{
    CRATER_COEFFICIENT, CRATER_EXPONENT, JOULES_PER_MEGATON, LARGE_IMPACTOR_DIAMETER_M,
    LARGE_SHOCKWAVE_COEFFICIENT, METERS_PER_KM, SEISMIC_OFFSET, SEISMIC_SLOPE,
    SMALL_SHOCKWAVE_COEFFICIENT, TARGET_DENSITY, THERMAL_COEFFICIENT,
};
use crate::error::PhysicsError;
use crate::parse::{parse_diameter_m, parse_velocity_km_s};

/// Numeric inputs to the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactInputs {
    /// Impact energy in megatons.
    pub energy_megatons: f64,
    /// Impactor diameter in meters.
    pub diameter_m: f64,
    /// Earth-relative velocity in km/s.
    pub velocity_km_s: f64,
}

impl ImpactInputs {
    /// Parse the textual quantities of a resolved scenario.
    pub fn from_scenario(scenario: &ImpactScenario) -> Result<Self, PhysicsError> {
        Ok(Self {
            energy_megatons: scenario.energy_megatons,
            diameter_m: parse_diameter_m(&scenario.diameter)?,
            velocity_km_s: parse_velocity_km_s(&scenario.impact_velocity)?,
        })
    }
}

/// Convert megatons of TNT to joules.
pub fn energy_joules(energy_megatons: f64) -> f64 {
    energy_megatons * JOULES_PER_MEGATON
}

/// Crater diameter in kilometres.
pub fn crater_diameter_km(energy_joules: f64) -> f64 {
    CRATER_COEFFICIENT * (energy_joules / TARGET_DENSITY).powf(CRATER_EXPONENT) / METERS_PER_KM
}

/// Blast coefficient: 9 above 1000 m diameter, 3.5 otherwise.
pub fn shockwave_coefficient(diameter_m: f64) -> f64 {
    if diameter_m > LARGE_IMPACTOR_DIAMETER_M {
        LARGE_SHOCKWAVE_COEFFICIENT
    } else {
        SMALL_SHOCKWAVE_COEFFICIENT
    }
}

/// Shockwave radius in kilometres.
pub fn shockwave_radius_km(coefficient: f64, energy_megatons: f64) -> f64 {
    coefficient * energy_megatons.powf(1.0 / 3.0)
}

/// Equivalent earthquake magnitude.
pub fn seismic_magnitude(energy_joules: f64) -> f64 {
    SEISMIC_SLOPE * energy_joules.log10() - SEISMIC_OFFSET
}

/// Thermal radiation radius in kilometres.
pub fn thermal_radius_km(energy_megatons: f64) -> f64 {
    THERMAL_COEFFICIENT * energy_megatons.sqrt()
}

/// Evaluate every derived quantity.
///
/// # Errors
///
/// Returns [`PhysicsError::NonPositiveEnergy`] when the energy is zero,
/// negative, or not finite.
pub fn compute(inputs: &ImpactInputs) -> Result<DerivedPhysics, PhysicsError> {
    let energy_mt = inputs.energy_megatons;
    if !energy_mt.is_finite() || energy_mt <= 0.0 {
        return Err(PhysicsError::NonPositiveEnergy(energy_mt));
    }

    let joules = energy_joules(energy_mt);
    let coefficient = shockwave_coefficient(inputs.diameter_m);

    let physics = DerivedPhysics {
        energy_joules: joules,
        crater_diameter_km: crater_diameter_km(joules),
        shockwave_coefficient: coefficient,
        shockwave_radius_km: shockwave_radius_km(coefficient, energy_mt),
        seismic_magnitude: seismic_magnitude(joules),
        thermal_radius_km: thermal_radius_km(energy_mt),
    };

    tracing::debug!(
        energy_mt,
        diameter_m = inputs.diameter_m,
        crater_km = physics.crater_diameter_km,
        thermal_km = physics.thermal_radius_km,
        "impact physics evaluated"
    );

    Ok(physics)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use meteocraft_types::ScenarioSource;

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs().max(1.0) * 1e-12;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn scenario(diameter: &str, velocity: &str, energy: f64) -> ImpactScenario {
        ImpactScenario {
            asteroid_name: String::from("test"),
            diameter: diameter.to_owned(),
            impact_velocity: velocity.to_owned(),
            impact_probability: 0.0,
            energy_megatons: energy,
            mass_kg: 0.0,
            candidate_impact_dates: Vec::new(),
            source: ScenarioSource::Fallback,
        }
    }

    #[test]
    fn preset_impactor_values() {
        let inputs = ImpactInputs::from_scenario(&scenario(".8 km", "15 km/s", 21_600.0)).unwrap();
        assert_close(inputs.diameter_m, 800.0);
        assert_close(inputs.velocity_km_s, 15.0);

        let physics = compute(&inputs).unwrap();
        assert_close(physics.energy_joules, 9.037_44e19);
        assert_close(physics.crater_diameter_km, 51.895_421_705_667_694);
        assert_close(physics.shockwave_coefficient, 3.5);
        assert_close(physics.shockwave_radius_km, 97.473_365_505_868_34);
        assert_close(physics.seismic_magnitude, 7.500_550_436_096_801);
        assert_close(physics.thermal_radius_km, 440.908_153_700_972_1);
    }

    #[test]
    fn fallback_values() {
        let inputs = ImpactInputs::from_scenario(&scenario(".5 km", "20 km/s", 1000.0)).unwrap();
        let physics = compute(&inputs).unwrap();
        assert_close(physics.energy_joules, 4.184e18);
        assert_close(physics.crater_diameter_km, 21.020_480_926_670_5);
        assert_close(physics.shockwave_radius_km, 35.0);
        assert_close(physics.seismic_magnitude, 6.606_466_422_825_677);
        assert_close(physics.thermal_radius_km, 94.868_329_805_051_37);
    }

    #[test]
    fn coefficient_threshold() {
        let small = ImpactInputs {
            energy_megatons: 1000.0,
            diameter_m: 500.0,
            velocity_km_s: 20.0,
        };
        let large = ImpactInputs {
            diameter_m: 2000.0,
            ..small
        };
        assert_close(compute(&small).unwrap().shockwave_coefficient, 3.5);
        assert_close(compute(&large).unwrap().shockwave_coefficient, 9.0);
        assert_close(compute(&large).unwrap().shockwave_radius_km, 90.0);

        // Exactly 1000 m is not "greater than" the threshold.
        assert_close(shockwave_coefficient(1000.0), 3.5);
    }

    #[test]
    fn rejects_unusable_energy() {
        let zero = ImpactInputs {
            energy_megatons: 0.0,
            diameter_m: 500.0,
            velocity_km_s: 20.0,
        };
        assert_eq!(compute(&zero), Err(PhysicsError::NonPositiveEnergy(0.0)));

        let nan = ImpactInputs {
            energy_megatons: f64::NAN,
            ..zero
        };
        assert!(compute(&nan).is_err());
    }

    #[test]
    fn malformed_scenario_quantities() {
        let err = ImpactInputs::from_scenario(&scenario("No disponible", "20 km/s", 1.0));
        assert!(matches!(
            err,
            Err(PhysicsError::InvalidInput {
                field: "diameter",
                ..
            })
        ));

        let err = ImpactInputs::from_scenario(&scenario(".5 km", "N/A km/s", 1.0));
        assert!(matches!(
            err,
            Err(PhysicsError::InvalidInput {
                field: "velocity",
                ..
            })
        ));
    }

    #[test]
    fn deterministic() {
        let inputs = ImpactInputs {
            energy_megatons: 123.4,
            diameter_m: 250.0,
            velocity_km_s: 18.0,
        };
        assert_eq!(compute(&inputs).unwrap(), compute(&inputs).unwrap());
    }
}

//! Closed-form impact physics for the Meteocraft impact estimator.
//!
//! Everything in this crate is pure and deterministic: the same
//! [`ImpactInputs`] always produce the same [`DerivedPhysics`].
//!
//! # Modules
//!
//! - [`constants`] -- Scaling constants used by the formulas.
//! - [`error`] -- [`PhysicsError`] for malformed inputs.
//! - [`parse`] -- Leading-number parsing of quantities like `".5 km"`.
//! - [`calculator`] -- The individual formulas and [`compute`].
//!
//! [`DerivedPhysics`]: meteocraft_types::DerivedPhysics

pub mod calculator;
pub mod constants;
pub mod error;
pub mod parse;

pub use calculator::{
    ImpactInputs, compute, crater_diameter_km, energy_joules, seismic_magnitude,
    shockwave_coefficient, shockwave_radius_km, thermal_radius_km,
};
pub use error::PhysicsError;
pub use parse::{parse_diameter_m, parse_leading_number, parse_velocity_km_s};

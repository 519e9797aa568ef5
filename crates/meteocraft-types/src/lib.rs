//! Shared type definitions for the Meteocraft impact estimator.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Wire types flow downstream to `TypeScript` via `ts-rs` for
//! the browser front end.
//!
//! # Modules
//!
//! - [`geo`] -- Validated geographic coordinates
//! - [`scenario`] -- The resolved impact scenario and where it came from
//! - [`report`] -- Derived physics and population exposure results
//! - [`wire`] -- `/simulate` request and response payloads

pub mod geo;
pub mod report;
pub mod scenario;
pub mod wire;

// Re-export all public types at crate root for convenience.
pub use geo::{GeoError, GeoPoint};
pub use report::{DerivedPhysics, ExposureResult};
pub use scenario::{DEFAULT_ASTEROID_NAME, ImpactScenario, ScenarioSource};
pub use wire::{SimulateRequest, SimulateResponse};

//! Impact scenario resolution for the Meteocraft impact estimator.
//!
//! A scenario comes from one of three places:
//!
//! ```text
//! name --> preset catalogue? --yes--> fixed literal values
//!              | no
//!              v
//!          SBDB lookup --ok--> extracted record
//!              | any failure
//!              v
//!          fallback scenario
//! ```
//!
//! Callers never see a lookup failure: [`ScenarioResolver::resolve`]
//! always returns a scenario and logs why it fell back.

pub mod client;
pub mod error;
pub mod presets;
pub mod record;
pub mod resolver;

pub use client::{DEFAULT_TIMEOUT, SbdbClient};
pub use error::SbdbError;
pub use presets::{PresetCatalog, fallback_scenario};
pub use record::scenario_from_record;
pub use resolver::{AsteroidLookup, ScenarioResolver, requested_name};

//! HTTP service for the Meteocraft impact estimator.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **HTML pages** (`GET /`, `GET /meteorito`) rendered with `minijinja`
//! - **Simulation endpoint** (`POST /simulate`) returning the physics and
//!   exposed population of an impact
//! - **Scenario endpoint** (`GET /api/scenario`) returning what an
//!   asteroid name resolves to
//! - **Static assets** (`GET /static/*`) for the front-end script
//!
//! # Request flow
//!
//! ```text
//! POST /simulate --> validate lat/lon --> resolve scenario --> physics
//!                                                                |
//!          JSON response <-- population sum <-- raster clip <---+
//! ```
//!
//! The raster read runs on the blocking pool; the scenario lookup runs
//! on the async runtime and never holds the raster lock.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{ConfigError, MeteocraftConfig};
pub use error::SimulateError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;

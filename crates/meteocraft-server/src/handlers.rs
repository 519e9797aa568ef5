//! Endpoint handlers for the simulation API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Landing page |
//! | `GET` | `/meteorito` | Simulator page with placeholder values |
//! | `POST` | `/simulate` | Physics and exposure for an impact point |
//! | `GET` | `/api/scenario` | The resolved scenario for an asteroid name |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Html;
use meteocraft_exposure::estimate_exposure;
use meteocraft_physics::{ImpactInputs, compute};
use meteocraft_sbdb::requested_name;
use meteocraft_types::{GeoPoint, ImpactScenario, SimulateRequest, SimulateResponse};
use tracing::info;

use crate::error::SimulateError;
use crate::pages::SimulatorPage;
use crate::state::AppState;

/// Query parameters for `GET /api/scenario`.
#[derive(Debug, serde::Deserialize)]
pub struct ScenarioQuery {
    /// Asteroid to resolve; the default impactor when absent.
    pub asteroid_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Serve the landing page.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, SimulateError> {
    Ok(Html(state.pages.index()?))
}

/// Serve the simulator page with placeholder values.
pub async fn meteorito(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, SimulateError> {
    let html = state
        .pages
        .simulator(&SimulatorPage::default(), state.resolver.presets().names())?;
    Ok(Html(html))
}

// ---------------------------------------------------------------------------
// POST /simulate
// ---------------------------------------------------------------------------

/// Resolve the scenario, compute its physics, and count the population
/// inside the thermal footprint around the impact point.
///
/// # Errors
///
/// - 400 when `lat`/`lon` are missing, the body is malformed, or the
///   coordinates are out of range.
/// - 422 when the scenario quantities cannot be parsed.
/// - 500 when the raster cannot be read.
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Result<Json<SimulateResponse>, SimulateError> {
    let Json(request) = payload.map_err(|e| SimulateError::InvalidBody(e.body_text()))?;

    let (Some(lat), Some(lon)) = (request.lat, request.lon) else {
        return Err(SimulateError::MissingCoordinates);
    };
    let point = GeoPoint::new(lat, lon)?;
    let name = requested_name(request.asteroid_name.as_deref());

    let scenario = state.resolver.resolve(name).await;
    let inputs = ImpactInputs::from_scenario(&scenario)?;
    let physics = compute(&inputs)?;

    let raster = Arc::clone(&state.raster);
    let thermal_radius_km = physics.thermal_radius_km;
    let exposure = tokio::task::spawn_blocking(move || {
        estimate_exposure(&*raster, &point, thermal_radius_km)
    })
    .await
    .map_err(|e| SimulateError::Internal(format!("exposure task failed: {e}")))??;

    info!(
        asteroid = name,
        source = ?scenario.source,
        %point,
        energy_mt = inputs.energy_megatons,
        population = exposure.population_total,
        "Simulation complete"
    );

    Ok(Json(SimulateResponse::new(
        inputs.diameter_m,
        inputs.energy_megatons,
        &physics,
        &exposure,
    )))
}

// ---------------------------------------------------------------------------
// GET /api/scenario
// ---------------------------------------------------------------------------

/// Return the scenario an asteroid name resolves to.
pub async fn scenario(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScenarioQuery>,
) -> Json<ImpactScenario> {
    let name = requested_name(query.asteroid_name.as_deref());
    Json(state.resolver.resolve(name).await)
}

//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with permissive CORS
//! and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- landing page
/// - `GET /meteorito` -- simulator page
/// - `POST /simulate` -- impact simulation
/// - `GET /api/scenario` -- resolved scenario for an asteroid name
/// - `GET /static/*` -- front-end assets from the static directory
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/meteorito", get(handlers::meteorito))
        // API
        .route("/simulate", post(handlers::simulate))
        .route("/api/scenario", get(handlers::scenario))
        // Front-end assets
        .nest_service("/static", assets)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

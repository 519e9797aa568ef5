//! Error types for the simulation API.
//!
//! [`SimulateError`] unifies all failure modes of a request into a single
//! enum that converts into an Axum HTTP response. Lookup failures never
//! appear here: the resolver has already substituted the fallback.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use meteocraft_exposure::ExposureError;
use meteocraft_physics::PhysicsError;
use meteocraft_types::GeoError;
use tracing::error;

/// Exact message for a request without coordinates.
pub const MISSING_COORDINATES: &str = "Faltan latitud o longitud";

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum SimulateError {
    /// `lat` or `lon` absent or null.
    #[error("Faltan latitud o longitud")]
    MissingCoordinates,

    /// The body is not a JSON object of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Coordinates outside the valid range.
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(#[from] GeoError),

    /// The resolved scenario has quantities the physics cannot use.
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// The population raster could not be read.
    #[error(transparent)]
    Exposure(#[from] ExposureError),

    /// A page template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An internal error occurred (task join failure).
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for SimulateError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingCoordinates | Self::InvalidBody(_) | Self::InvalidCoordinates(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Physics(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Exposure(_) | Self::Template(_) | Self::Internal(_) => {
                error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({ "error": self.to_string() });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            SimulateError::MissingCoordinates.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SimulateError::InvalidCoordinates(GeoError::LatitudeOutOfRange(91.0))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SimulateError::Physics(PhysicsError::NonPositiveEnergy(0.0))
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            SimulateError::Internal(String::from("join"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_coordinates_message_is_exact() {
        assert_eq!(
            SimulateError::MissingCoordinates.to_string(),
            MISSING_COORDINATES
        );
    }
}

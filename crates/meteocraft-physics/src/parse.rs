//! Parsing of textual quantities such as `".5 km"` or `"20 km/s"`.
//!
//! Only the first whitespace-delimited token is numeric; whatever follows
//! is a unit label.

use crate::constants::METERS_PER_KM;
use crate::error::PhysicsError;

/// Parse the first whitespace-delimited token of `text` as a number.
///
/// Leading-dot forms like `".5"` are accepted. Empty input, a non-numeric
/// first token, and non-finite values (`inf`, `NaN`) are rejected.
pub fn parse_leading_number(field: &'static str, text: &str) -> Result<f64, PhysicsError> {
    let invalid = || PhysicsError::InvalidInput {
        field,
        value: text.to_owned(),
    };

    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(invalid)
}

/// Parse a diameter into meters.
///
/// The value is taken as kilometres unless the unit token is `m`.
pub fn parse_diameter_m(text: &str) -> Result<f64, PhysicsError> {
    let value = parse_leading_number("diameter", text)?;
    if value < 0.0 {
        return Err(PhysicsError::InvalidInput {
            field: "diameter",
            value: text.to_owned(),
        });
    }
    let unit = text.split_whitespace().nth(1);
    if unit == Some("m") {
        Ok(value)
    } else {
        Ok(value * METERS_PER_KM)
    }
}

/// Parse a velocity in km/s.
pub fn parse_velocity_km_s(text: &str) -> Result<f64, PhysicsError> {
    let value = parse_leading_number("velocity", text)?;
    if value < 0.0 {
        return Err(PhysicsError::InvalidInput {
            field: "velocity",
            value: text.to_owned(),
        });
    }
    Ok(value)
}

//! Error types for the physics calculator.

/// Errors raised when impact parameters cannot be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    /// A textual quantity did not start with a usable number.
    #[error("invalid {field}: {value:?}")]
    InvalidInput {
        /// Which parameter was malformed (`diameter`, `velocity`).
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// Energy must be finite and strictly positive for the logarithm.
    #[error("impact energy must be positive, got {0} Mt")]
    NonPositiveEnergy(f64),
}

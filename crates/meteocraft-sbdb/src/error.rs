//! Error types for asteroid lookups.
//!
//! None of these reach an HTTP client: the resolver converts every one of
//! them into the fallback scenario.

/// Errors that can occur while looking up an asteroid.
#[derive(Debug, thiserror::Error)]
pub enum SbdbError {
    /// No lookup URL is configured.
    #[error("asteroid lookup is not configured")]
    NotConfigured,

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// The request failed (connection, DNS, timeout).
    #[error("SBDB request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("SBDB returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logging.
        body: String,
    },

    /// The body was not JSON.
    #[error("SBDB response parse failed: {0}")]
    Decode(String),

    /// The API reported an error in its JSON body.
    #[error("SBDB error: {0}")]
    Api(String),

    /// The record lacks something a scenario needs.
    #[error("unusable SBDB record: {0}")]
    Malformed(String),
}

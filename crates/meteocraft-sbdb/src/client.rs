//! HTTP client for the JPL Small-Body Database API.

use std::time::Duration;

use crate::error::SbdbError;

/// Upper bound on a single lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for `GET {api_url}?sstr=...&phys-par=1&ca-data=true&vi-data=true`.
///
/// One request per lookup, no retries.
#[derive(Debug, Clone)]
pub struct SbdbClient {
    client: reqwest::Client,
    api_url: String,
}

impl SbdbClient {
    /// Create a client with the given request timeout.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, SbdbError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SbdbError::Client(e.to_string()))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// The configured endpoint.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the physical-parameter, close-approach and virtual-impactor
    /// record for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SbdbError::Request`] on connection failure or timeout,
    /// [`SbdbError::Status`] on a non-2xx answer, and
    /// [`SbdbError::Decode`] if the body is not JSON.
    pub async fn fetch(&self, name: &str) -> Result<serde_json::Value, SbdbError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("sstr", name),
                ("phys-par", "1"),
                ("ca-data", "true"),
                ("vi-data", "true"),
            ])
            .send()
            .await
            .map_err(|e| SbdbError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(SbdbError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SbdbError::Decode(e.to_string()))
    }
}

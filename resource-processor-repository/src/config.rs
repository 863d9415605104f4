//! Configuration types for the ES feeder client.

use std::time::Duration;

/// Default request timeout for the re-index call.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for [`EsFeederProvider`](crate::EsFeederProvider).
#[derive(Debug, Clone)]
pub struct EsFeederConfig {
    /// Endpoint that accepts the `PUT` re-index request.
    pub url: String,
    /// Total timeout for one request, including reading the body.
    pub timeout: Duration,
}

impl EsFeederConfig {
    /// Create a config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

//! Configuration for the Frank Energie API client.
//!
//! This module provides [`ApiConfig`], holding the GraphQL endpoint and the
//! request timeouts. The defaults target the production endpoint; tests
//! point the endpoint at a local mock server instead.

use std::time::Duration;

/// The production GraphQL endpoint.
pub const DATA_URL: &str = "https://frank-graphql-prod.graphcdn.app/";

/// Per-call timeout for normal queries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the schema-introspection utility call.
pub const INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration: endpoint URL and request timeouts.
///
/// # Example
///
/// ```rust
/// use frank_energie::ApiConfig;
///
/// let config = ApiConfig::default();
/// assert_eq!(config.endpoint(), "https://frank-graphql-prod.graphcdn.app/");
///
/// // Point at a different endpoint, e.g. a mock server in tests
/// let config = ApiConfig::default().with_endpoint("http://localhost:8080/");
/// assert_eq!(config.endpoint(), "http://localhost:8080/");
/// ```
#[derive(Clone, Debug)]
pub struct ApiConfig {
    endpoint: String,
    timeout: Duration,
    introspection_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DATA_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            introspection_timeout: INTROSPECTION_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Returns the configured GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the per-call timeout for normal queries.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the timeout for the schema-introspection call.
    #[must_use]
    pub const fn introspection_timeout(&self) -> Duration {
        self.introspection_timeout
    }

    /// Replaces the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replaces the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the introspection timeout.
    #[must_use]
    pub const fn with_introspection_timeout(mut self, timeout: Duration) -> Self {
        self.introspection_timeout = timeout;
        self
    }
}

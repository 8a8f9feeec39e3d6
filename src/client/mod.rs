//! Frank Energie API client.
//!
//! This module provides the [`FrankEnergie`] client type and its request
//! pipeline: header composition, lazy transport creation, HTTP-status
//! mapping, envelope parsing, and GraphQL error classification.
//!
//! # Thread Safety
//!
//! `FrankEnergie` is `Send + Sync`; read-only operations take `&self` and
//! may be awaited concurrently. Only `login` and `renew_token` take
//! `&mut self`, since they replace the stored credentials.
//!
//! # Example
//!
//! ```rust,ignore
//! use frank_energie::FrankEnergie;
//!
//! let mut client = FrankEnergie::new();
//! client.login("user@example.com", "password").await?;
//!
//! let summary = client.month_summary("1234AB 10").await?;
//! println!("Expected costs this month: {:?}", summary.expected_costs);
//! ```

mod classifier;
mod operations;
mod query;

pub use query::GraphQlQuery;

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::auth::Authentication;
use crate::config::ApiConfig;
use crate::error::FrankEnergieError;

/// Frank Energie API client.
///
/// Holds the endpoint configuration, the lazily-created (or caller-supplied)
/// HTTP connection pool, and the optional credentials. "Authenticated" means
/// credentials are present and carry an access token.
#[derive(Debug)]
pub struct FrankEnergie {
    config: ApiConfig,
    /// Transport pool, created on first use unless supplied by the caller.
    http: OnceLock<reqwest::Client>,
    auth: Option<Authentication>,
}

// Verify FrankEnergie is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FrankEnergie>();
};

impl Default for FrankEnergie {
    fn default() -> Self {
        Self::new()
    }
}

impl FrankEnergie {
    /// Creates an unauthenticated client against the production endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Creates an unauthenticated client with the given configuration.
    #[must_use]
    pub fn with_config(config: ApiConfig) -> Self {
        Self {
            config,
            http: OnceLock::new(),
            auth: None,
        }
    }

    /// Starts the session from pre-existing tokens, e.g. restored from
    /// storage.
    #[must_use]
    pub fn with_tokens(
        mut self,
        auth_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.auth = Some(Authentication::new(
            Some(auth_token.into()),
            Some(refresh_token.into()),
        ));
        self
    }

    /// Supplies an existing HTTP client instead of creating one lazily.
    ///
    /// A supplied client is shared infrastructure: this crate never shuts it
    /// down.
    #[must_use]
    pub fn with_http_client(self, client: reqwest::Client) -> Self {
        // A no-op if a transport was already installed.
        let _ = self.http.set(client);
        self
    }

    /// Returns `true` if credentials with an access token are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth
            .as_ref()
            .is_some_and(Authentication::is_authenticated)
    }

    /// Returns the current credentials, if any.
    #[must_use]
    pub const fn authentication(&self) -> Option<&Authentication> {
        self.auth.as_ref()
    }

    pub(crate) fn set_authentication(&mut self, auth: Authentication) {
        self.auth = Some(auth);
    }

    pub(crate) fn introspection_timeout(&self) -> Duration {
        self.config.introspection_timeout()
    }

    pub(crate) fn require_auth(&self) -> Result<&Authentication, FrankEnergieError> {
        self.auth
            .as_ref()
            .filter(|auth| auth.is_authenticated())
            .ok_or(FrankEnergieError::AuthRequired)
    }

    fn http_client(&self) -> &reqwest::Client {
        self.http.get_or_init(|| {
            reqwest::Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to create HTTP client")
        })
    }

    /// Sends a query through the request pipeline with the default timeout.
    pub(crate) async fn send(
        &self,
        query: &GraphQlQuery,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<Value, FrankEnergieError> {
        self.send_with_timeout(query, extra_headers, self.config.timeout())
            .await
    }

    /// The request pipeline: compose headers, POST the payload, map
    /// HTTP-status failures, parse the envelope, classify GraphQL errors.
    pub(crate) async fn send_with_timeout(
        &self,
        query: &GraphQlQuery,
        extra_headers: Option<HashMap<String, String>>,
        timeout: Duration,
    ) -> Result<Value, FrankEnergieError> {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        if let Some(token) = self.auth.as_ref().and_then(|auth| auth.auth_token.as_deref()) {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }

        // Per-call overrides win, e.g. the x-country routing header.
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        tracing::debug!(
            operation = query.operation_name(),
            headers = ?redacted_headers(&headers),
            payload = %query.sanitized(),
            "sending GraphQL request"
        );

        let response = self
            .http_client()
            .post(self.config.endpoint())
            .timeout(timeout)
            .json(&query.to_payload())
            .headers(build_header_map(&headers)?)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(error = %err, operation = query.operation_name(), "request failed");
                FrankEnergieError::from(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            tracing::debug!("no response data");
            return Ok(Value::Object(Map::new()));
        }

        let envelope: Value = serde_json::from_str(&body)
            .map_err(|err| FrankEnergieError::Network(format!("invalid JSON response: {err}")))?;

        classifier::classify(&envelope)?;

        Ok(envelope)
    }
}

/// Maps a non-2xx HTTP status onto the error taxonomy.
fn error_for_status(status: StatusCode) -> FrankEnergieError {
    match status {
        StatusCode::UNAUTHORIZED => FrankEnergieError::AuthRequired,
        StatusCode::FORBIDDEN => {
            FrankEnergieError::Auth("Forbidden: Invalid credentials.".to_string())
        }
        StatusCode::BAD_REQUEST => {
            FrankEnergieError::Request("Bad request: Invalid query.".to_string())
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            FrankEnergieError::Auth("Internal server error.".to_string())
        }
        other => FrankEnergieError::Auth(format!("Unexpected response: {other}")),
    }
}

/// Copy of the request headers safe for diagnostic output, with the bearer
/// token masked.
fn redacted_headers(headers: &HashMap<String, String>) -> HashMap<&str, &str> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                (name.as_str(), "Bearer *****")
            } else {
                (name.as_str(), value.as_str())
            }
        })
        .collect()
}

fn build_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, FrankEnergieError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            FrankEnergieError::InvalidInput(format!("invalid header name '{name}': {err}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            FrankEnergieError::InvalidInput(format!("invalid header value for '{name}': {err}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrankEnergie>();
    }

    #[test]
    fn test_new_client_is_unauthenticated() {
        let client = FrankEnergie::new();
        assert!(!client.is_authenticated());
        assert!(client.authentication().is_none());
    }

    #[test]
    fn test_with_tokens_is_authenticated() {
        let client = FrankEnergie::new().with_tokens("a", "b");
        assert!(client.is_authenticated());
        assert_eq!(
            client.authentication().and_then(|a| a.auth_token.as_deref()),
            Some("a")
        );
    }

    #[test]
    fn test_require_auth_without_credentials() {
        let client = FrankEnergie::new();
        assert!(matches!(
            client.require_auth(),
            Err(FrankEnergieError::AuthRequired)
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED),
            FrankEnergieError::AuthRequired
        ));
        assert!(matches!(
            error_for_status(StatusCode::FORBIDDEN),
            FrankEnergieError::Auth(msg) if msg == "Forbidden: Invalid credentials."
        ));
        assert!(matches!(
            error_for_status(StatusCode::BAD_REQUEST),
            FrankEnergieError::Request(msg) if msg == "Bad request: Invalid query."
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR),
            FrankEnergieError::Auth(msg) if msg == "Internal server error."
        ));
        assert!(matches!(
            error_for_status(StatusCode::IM_A_TEAPOT),
            FrankEnergieError::Auth(msg) if msg.starts_with("Unexpected response:")
        ));
    }

    #[test]
    fn test_redacted_headers_masks_bearer_token() {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Bearer secret".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        let redacted = redacted_headers(&headers);
        assert_eq!(redacted["Authorization"], "Bearer *****");
        assert_eq!(redacted["Accept"], "application/json");
    }

    #[test]
    fn test_build_header_map_rejects_invalid_names() {
        let mut headers = HashMap::new();
        headers.insert("bad header\n".to_string(), "x".to_string());
        assert!(matches!(
            build_header_map(&headers),
            Err(FrankEnergieError::InvalidInput(_))
        ));
    }
}

//! Error types for the Frank Energie API client.
//!
//! All fallible operations in this crate return [`FrankEnergieError`]. The
//! variants mirror the failure classes of the vendor API: missing or invalid
//! sessions, server-side rejections, malformed requests, transport failures,
//! and account-capability gaps.
//!
//! # Example
//!
//! ```rust,ignore
//! use frank_energie::{FrankEnergie, FrankEnergieError};
//!
//! match client.month_summary("1234AB 10").await {
//!     Ok(summary) => println!("Expected costs: {:?}", summary.expected_costs),
//!     Err(FrankEnergieError::AuthRequired) => println!("Log in first"),
//!     Err(err) => println!("Request failed: {err}"),
//! }
//! ```

use thiserror::Error;

/// Errors produced by the Frank Energie API client.
///
/// Transport and HTTP-status failures are normalized at the request pipeline
/// boundary; GraphQL-level business errors are normalized by the error
/// classifier. Every variant carries a human-readable message.
#[derive(Debug, Error)]
pub enum FrankEnergieError {
    /// No valid session is present, or the server demands authentication.
    ///
    /// The caller must log in (or renew the token) before retrying.
    #[error("Authentication is required")]
    AuthRequired,

    /// The server rejected the request for credential, authorization,
    /// country-restriction, or server-side reasons.
    #[error("{0}")]
    Auth(String),

    /// The request itself was malformed, or the response could not be
    /// decoded into the expected shape.
    #[error("{0}")]
    Request(String),

    /// A transport-level failure: timeout, connection error, or an
    /// unreadable response body.
    #[error("Request failed: {0}")]
    Network(String),

    /// Smart trading is not enabled for this account.
    ///
    /// Signals a capability gap rather than a failure.
    #[error("Smart trading is not enabled for this user")]
    SmartTradingNotEnabled,

    /// Smart charging is not enabled for this account.
    ///
    /// Signals a capability gap rather than a failure.
    #[error("Smart charging is not enabled for this user")]
    SmartChargingNotEnabled,

    /// A caller-supplied argument failed validation before any network
    /// call was attempted.
    #[error("{0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for FrankEnergieError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_required_message() {
        let error = FrankEnergieError::AuthRequired;
        assert_eq!(error.to_string(), "Authentication is required");
    }

    #[test]
    fn test_auth_error_carries_message() {
        let error = FrankEnergieError::Auth("Invalid password".to_string());
        assert_eq!(error.to_string(), "Invalid password");
    }

    #[test]
    fn test_network_error_message_is_prefixed() {
        let error = FrankEnergieError::Network("connection refused".to_string());
        assert_eq!(error.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn test_feature_gap_messages() {
        assert_eq!(
            FrankEnergieError::SmartTradingNotEnabled.to_string(),
            "Smart trading is not enabled for this user"
        );
        assert_eq!(
            FrankEnergieError::SmartChargingNotEnabled.to_string(),
            "Smart charging is not enabled for this user"
        );
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = FrankEnergieError::AuthRequired;
        let _: &dyn std::error::Error = &error;
    }
}

//! Credential handling for the Frank Energie API.
//!
//! This module provides the [`Authentication`] type holding the access and
//! refresh tokens returned by the `Login` and `RenewToken` mutations.
//!
//! # Security
//!
//! [`Authentication`] implements a custom [`Debug`](std::fmt::Debug) that
//! masks token values, preventing accidental exposure in logs.
//!
//! # Example
//!
//! ```rust
//! use frank_energie::Authentication;
//!
//! let auth = Authentication::new(Some("secret".to_string()), None);
//! assert!(auth.is_authenticated());
//!
//! let debug = format!("{auth:?}");
//! assert!(!debug.contains("secret"));
//! ```

use serde_json::Value;

use crate::error::FrankEnergieError;

/// The access/refresh token pair representing an authenticated session.
///
/// Created on successful login, when constructed with pre-existing tokens,
/// or from a renewal response. Replaced wholesale on renewal; never mutated
/// field-by-field.
#[derive(Clone, PartialEq, Eq)]
pub struct Authentication {
    /// The bearer token sent with authenticated requests.
    pub auth_token: Option<String>,
    /// The token used to renew an expired session.
    pub refresh_token: Option<String>,
}

impl Authentication {
    /// Creates credentials from pre-existing tokens.
    #[must_use]
    pub const fn new(auth_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            auth_token,
            refresh_token,
        }
    }

    /// Returns `true` if a usable access token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Builds credentials from a `Login` or `RenewToken` response envelope.
    ///
    /// Accepts both payload locations: `data.login` and `data.renewToken`.
    ///
    /// # Errors
    ///
    /// Returns [`FrankEnergieError::Auth`] when the envelope carries no
    /// authentication payload, which is how the server answers a rejected
    /// login.
    pub fn from_response(envelope: &Value) -> Result<Self, FrankEnergieError> {
        let data = envelope.get("data");
        let payload = data
            .and_then(|d| d.get("login"))
            .or_else(|| data.and_then(|d| d.get("renewToken")))
            .filter(|p| !p.is_null())
            .ok_or_else(|| {
                FrankEnergieError::Auth(
                    "Authentication failed: no authentication payload in response".to_string(),
                )
            })?;

        let token = |field: &str| {
            payload
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Ok(Self {
            auth_token: token("authToken"),
            refresh_token: token("refreshToken"),
        })
    }
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |token: &Option<String>| token.as_ref().map(|_| "*****");
        f.debug_struct("Authentication")
            .field("auth_token", &mask(&self.auth_token))
            .field("refresh_token", &mask(&self.refresh_token))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_authenticated_requires_auth_token() {
        assert!(Authentication::new(Some("a".to_string()), None).is_authenticated());
        assert!(!Authentication::new(None, Some("r".to_string())).is_authenticated());
        assert!(!Authentication::new(None, None).is_authenticated());
    }

    #[test]
    fn test_from_login_response() {
        let envelope = json!({
            "data": {
                "login": {"authToken": "hello", "refreshToken": "world"}
            }
        });

        let auth = Authentication::from_response(&envelope).unwrap();
        assert_eq!(auth.auth_token.as_deref(), Some("hello"));
        assert_eq!(auth.refresh_token.as_deref(), Some("world"));
    }

    #[test]
    fn test_from_renew_token_response() {
        let envelope = json!({
            "data": {
                "renewToken": {"authToken": "fresh", "refreshToken": "rotated"}
            }
        });

        let auth = Authentication::from_response(&envelope).unwrap();
        assert_eq!(auth.auth_token.as_deref(), Some("fresh"));
        assert_eq!(auth.refresh_token.as_deref(), Some("rotated"));
    }

    #[test]
    fn test_from_empty_response_is_auth_error() {
        let result = Authentication::from_response(&json!({}));
        assert!(matches!(result, Err(FrankEnergieError::Auth(_))));
    }

    #[test]
    fn test_from_null_payload_is_auth_error() {
        let result = Authentication::from_response(&json!({"data": {"login": null}}));
        assert!(matches!(result, Err(FrankEnergieError::Auth(_))));
    }

    #[test]
    fn test_debug_masks_tokens() {
        let auth = Authentication::new(
            Some("secret-token".to_string()),
            Some("secret-refresh".to_string()),
        );
        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret-token"));
        assert!(!debug.contains("secret-refresh"));
        assert!(debug.contains("*****"));
    }
}

//! Classification of GraphQL-level error messages.
//!
//! The vendor reports business errors inside the `errors` array of an
//! otherwise successful response. This module maps the known message strings
//! onto typed errors through a lookup table of exact messages plus an
//! ordered list of prefix rules, evaluated in array order. Unrecognized
//! messages are logged and ignored: the policy fails open.

use serde_json::Value;

use crate::error::FrankEnergieError;

/// What to do with a recognized error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    /// Fail with `Auth("Invalid password")`.
    InvalidPassword,
    /// Fail with `Auth("Not authorized")`.
    NotAuthorised,
    /// Fail with `AuthRequired`.
    AuthRequired,
    /// Fail with `Auth("Request failed: Graphql validation error")`.
    ValidationFailed,
    /// End classification successfully: empty-but-valid price data.
    NoMarketPrices,
    /// Fail with `Auth` carrying the server's message.
    NoConnections,
    /// Fail with `SmartTradingNotEnabled`.
    SmartTradingDisabled,
    /// Fail with `SmartChargingNotEnabled`.
    SmartChargingDisabled,
    /// Known-benign missing base tariff, log and continue.
    MissingBaseTariff,
    /// Fail with `Auth("Request not supported in the user's country")`.
    CountryNotSupported,
}

/// Exact message matches, checked first.
const EXACT_RULES: &[(&str, Outcome)] = &[
    ("user-error:password-invalid", Outcome::InvalidPassword),
    ("user-error:auth-not-authorised", Outcome::NotAuthorised),
    ("user-error:auth-required", Outcome::AuthRequired),
    ("Graphql validation error", Outcome::ValidationFailed),
    (
        "user-error:smart-trading-not-enabled",
        Outcome::SmartTradingDisabled,
    ),
    (
        "user-error:smart-charging-not-enabled",
        Outcome::SmartChargingDisabled,
    ),
    (
        "'Base' niet aanwezig in prijzen verzameling",
        Outcome::MissingBaseTariff,
    ),
    (
        "request-error:request-not-supported-in-country",
        Outcome::CountryNotSupported,
    ),
];

/// Prefix rules, evaluated in order after the exact table misses.
const PREFIX_RULES: &[(&str, Outcome)] = &[
    ("No marketprices found for segment", Outcome::NoMarketPrices),
    ("No connections found for user", Outcome::NoConnections),
];

/// Inspects the `errors` array of a response envelope.
///
/// Empty envelopes and envelopes without `errors` pass unchanged. The first
/// entry whose outcome is an error interrupts classification; log-only
/// entries continue with subsequent entries.
///
/// # Errors
///
/// Returns the typed error mapped from the first fatal message.
pub(crate) fn classify(envelope: &Value) -> Result<(), FrankEnergieError> {
    let Some(errors) = envelope.get("errors").and_then(Value::as_array) else {
        return Ok(());
    };

    for entry in errors {
        let Some(message) = entry.get("message").and_then(Value::as_str) else {
            continue;
        };

        let outcome = EXACT_RULES
            .iter()
            .find(|(exact, _)| *exact == message)
            .or_else(|| {
                PREFIX_RULES
                    .iter()
                    .find(|(prefix, _)| message.starts_with(prefix))
            })
            .map(|(_, outcome)| *outcome);

        match outcome {
            Some(Outcome::InvalidPassword) => {
                return Err(FrankEnergieError::Auth("Invalid password".to_string()))
            }
            Some(Outcome::NotAuthorised) => {
                return Err(FrankEnergieError::Auth("Not authorized".to_string()))
            }
            Some(Outcome::AuthRequired) => return Err(FrankEnergieError::AuthRequired),
            Some(Outcome::ValidationFailed) => {
                return Err(FrankEnergieError::Auth(
                    "Request failed: Graphql validation error".to_string(),
                ))
            }
            Some(Outcome::NoMarketPrices) => return Ok(()),
            Some(Outcome::NoConnections) => {
                return Err(FrankEnergieError::Auth(format!("Request failed: {message}")))
            }
            Some(Outcome::SmartTradingDisabled) => {
                return Err(FrankEnergieError::SmartTradingNotEnabled)
            }
            Some(Outcome::SmartChargingDisabled) => {
                return Err(FrankEnergieError::SmartChargingNotEnabled)
            }
            Some(Outcome::MissingBaseTariff) => {
                tracing::debug!(path = ?entry.get("path"), "base tariff missing from price collection");
            }
            Some(Outcome::CountryNotSupported) => {
                return Err(FrankEnergieError::Auth(
                    "Request not supported in the user's country".to_string(),
                ))
            }
            None => {
                tracing::error!(message, "unhandled error in GraphQL response");
            }
        }
    }

    Ok(())
}

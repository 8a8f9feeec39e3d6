//! Typed response models for the Frank Energie API.
//!
//! Each result type is a plain data container constructed from the relevant
//! sub-object of a response envelope through the [`Decodable`] trait. The
//! request pipeline knows nothing about concrete model shapes; operation
//! methods pick the type to decode into.

mod chargers;
mod consumption;
mod invoices;
mod month_summary;
mod prices;
mod smart_battery;
mod usage;
mod user;

pub use chargers::{ChargeState, ChargerInformation, EnodeCharger, EnodeChargers};
pub use consumption::{EnergyConsumption, MeterReading};
pub use invoices::{Invoice, Invoices};
pub use month_summary::MonthSummary;
pub use prices::{MarketPrices, Price, PriceData};
pub use smart_battery::{
    SmartBatteries, SmartBattery, SmartBatteryDetails, SmartBatterySession, SmartBatterySessions,
    SmartBatterySummary,
};
pub use usage::{EnergyCategory, PeriodUsageAndCosts, UsageItem};
pub use user::{Address, DeliverySite, Me, User, UserSites};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::FrankEnergieError;

/// A result type constructible from a response envelope.
///
/// Implementations are pure: they read the relevant sub-object out of the
/// envelope and deserialize it, without touching client state.
pub trait Decodable: Sized {
    /// Decodes the value from a response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`FrankEnergieError::Request`] when the envelope does not
    /// carry the expected sub-object or the sub-object has the wrong shape.
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError>;
}

/// Looks up a non-null field inside the envelope's `data` object.
pub(crate) fn data_field<'a>(envelope: &'a Value, field: &str) -> Option<&'a Value> {
    envelope
        .get("data")
        .and_then(|data| data.get(field))
        .filter(|value| !value.is_null())
}

/// Deserializes `data.<field>` into `T`, with a typed error on a missing or
/// malformed field.
pub(crate) fn decode_data_field<T: DeserializeOwned>(
    envelope: &Value,
    field: &str,
) -> Result<T, FrankEnergieError> {
    let value = data_field(envelope, field).ok_or_else(|| {
        FrankEnergieError::Request(format!("Unexpected response: missing '{field}'"))
    })?;
    decode_value(value, field)
}

/// Deserializes an already-located sub-object into `T`.
pub(crate) fn decode_value<T: DeserializeOwned>(
    value: &Value,
    field: &str,
) -> Result<T, FrankEnergieError> {
    serde_json::from_value(value.clone()).map_err(|err| {
        FrankEnergieError::Request(format!("Unexpected response for '{field}': {err}"))
    })
}

/// Deserializes an RFC 3339 timestamp, mapping missing or malformed values
/// to `None` with a warning instead of failing the whole decode.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|text| match text.parse::<DateTime<Utc>>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(value = %text, "invalid timestamp in response, dropping");
            None
        }
    }))
}

//! Charger models for the `EnodeChargers` query.

use serde::Deserialize;
use serde_json::Value;

use super::{data_field, decode_value, lenient_datetime, Decodable};
use crate::error::FrankEnergieError;
use chrono::{DateTime, Utc};

/// Live charging state reported by the charger.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargeState {
    #[serde(default)]
    pub is_charging: Option<bool>,
    #[serde(default)]
    pub is_plugged_in: Option<bool>,
    /// Charge rate in kW.
    #[serde(default)]
    pub charge_rate: Option<f64>,
    /// Battery level percentage, when the charger reports it.
    #[serde(default)]
    pub battery_level: Option<f64>,
}

/// Static charger metadata.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargerInformation {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// A charger connected through the Enode integration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnodeCharger {
    pub id: String,
    #[serde(default)]
    pub is_reachable: Option<bool>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub charge_state: Option<ChargeState>,
    #[serde(default)]
    pub information: Option<ChargerInformation>,
}

/// The chargers attached to the account. Possibly empty; charger listing is
/// a best-effort feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnodeChargers {
    pub chargers: Vec<EnodeCharger>,
}

impl EnodeChargers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chargers.is_empty()
    }
}

impl Decodable for EnodeChargers {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        // An account without the integration simply has no payload.
        let Some(value) = data_field(envelope, "enodeChargers") else {
            return Ok(Self::default());
        };
        let chargers = decode_value(value, "enodeChargers")?;
        Ok(Self { chargers })
    }
}

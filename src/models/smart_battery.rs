//! Smart-battery models for the `SmartBatteries`, `SmartBattery`, and
//! `SmartBatterySessions` queries.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{data_field, decode_data_field, decode_value, lenient_datetime, Decodable};
use crate::error::FrankEnergieError;

/// A smart battery registered on the account.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmartBattery {
    /// Device id used as a variable in battery-scoped queries.
    pub id: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Capacity in kWh.
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub external_reference: Option<String>,
    /// Maximum charge power in kW.
    #[serde(default)]
    pub max_charge_power: Option<f64>,
    /// Maximum discharge power in kW.
    #[serde(default)]
    pub max_discharge_power: Option<f64>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The smart batteries of the account. Possibly empty; battery listing is a
/// best-effort feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmartBatteries {
    pub smart_batteries: Vec<SmartBattery>,
}

impl SmartBatteries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.smart_batteries.is_empty()
    }
}

impl Decodable for SmartBatteries {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        let Some(value) = data_field(envelope, "smartBatteries") else {
            return Ok(Self::default());
        };
        let smart_batteries = decode_value(value, "smartBatteries")?;
        Ok(Self { smart_batteries })
    }
}

/// Aggregated telemetry for one battery.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmartBatterySummary {
    /// Last reported state of charge, percent.
    #[serde(default)]
    pub last_known_state_of_charge: Option<i64>,
    #[serde(default)]
    pub last_known_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_update: Option<DateTime<Utc>>,
    /// Cumulative trading result in euros.
    #[serde(default)]
    pub total_result: Option<f64>,
}

/// Battery details combined with the telemetry summary, as returned by the
/// `SmartBattery` operation.
#[derive(Clone, Debug, PartialEq)]
pub struct SmartBatteryDetails {
    pub smart_battery: SmartBattery,
    pub summary: SmartBatterySummary,
}

impl Decodable for SmartBatteryDetails {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        Ok(Self {
            smart_battery: decode_data_field(envelope, "smartBattery")?,
            summary: decode_data_field(envelope, "smartBatterySummary")?,
        })
    }
}

/// One trading session of a battery.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmartBatterySession {
    /// Session date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub trading_result: Option<f64>,
    #[serde(default)]
    pub cumulative_trading_result: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// The trading sessions of a battery over a requested period.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmartBatterySessions {
    pub device_id: String,
    #[serde(default)]
    pub period_start_date: Option<String>,
    #[serde(default)]
    pub period_end_date: Option<String>,
    #[serde(default)]
    pub period_trade_index: Option<f64>,
    #[serde(default)]
    pub period_trading_result: Option<f64>,
    #[serde(default)]
    pub period_total_result: Option<f64>,
    #[serde(default)]
    pub period_imbalance_result: Option<f64>,
    #[serde(default)]
    pub period_epex_result: Option<f64>,
    #[serde(default)]
    pub period_frank_slim: Option<f64>,
    #[serde(default)]
    pub sessions: Vec<SmartBatterySession>,
}

impl Decodable for SmartBatterySessions {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        decode_data_field(envelope, "smartBatterySessions")
    }
}

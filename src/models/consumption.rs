//! Meter-reading models for the `ActualAndExpectedMeterReadings` query.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_value, Decodable};
use crate::error::FrankEnergieError;

/// A single daily meter reading.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeterReading {
    /// Reading date as `YYYY-MM-DD`.
    pub date: String,
    /// Consumption for that day in kWh.
    #[serde(default)]
    pub consumption_kwh: f64,
}

/// Actual and expected meter readings plus their completeness indicator.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyConsumption {
    /// Share of days with an actual reading, 0.0 to 1.0.
    #[serde(default)]
    pub completeness_percentage: Option<f64>,
    #[serde(default)]
    pub actual_meter_readings: Vec<MeterReading>,
    #[serde(default)]
    pub expected_meter_readings: Vec<MeterReading>,
}

impl EnergyConsumption {
    /// Total actual consumption over the returned period, in kWh.
    #[must_use]
    pub fn total_actual_kwh(&self) -> f64 {
        self.actual_meter_readings
            .iter()
            .map(|reading| reading.consumption_kwh)
            .sum()
    }
}

impl Decodable for EnergyConsumption {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        // The readings live at the top of the data object, not under a
        // dedicated field.
        let data = envelope.get("data").filter(|value| !value.is_null()).ok_or_else(|| {
            FrankEnergieError::Request("Unexpected response: missing meter readings".to_string())
        })?;
        decode_value(data, "meter readings")
    }
}

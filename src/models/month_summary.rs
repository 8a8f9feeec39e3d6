//! Month-summary model for the `MonthSummary` query.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_data_field, Decodable};
use crate::error::FrankEnergieError;

/// Cost summary for the current month of a delivery site.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Costs booked up to the last meter reading date.
    #[serde(default)]
    pub actual_costs_until_last_meter_reading_date: Option<f64>,
    /// Costs expected up to the last meter reading date.
    #[serde(default)]
    pub expected_costs_until_last_meter_reading_date: Option<f64>,
    /// Expected costs for the whole month.
    #[serde(default)]
    pub expected_costs: Option<f64>,
    /// Date of the last processed meter reading, `YYYY-MM-DD`.
    #[serde(default)]
    pub last_meter_reading_date: Option<String>,
    #[serde(default)]
    pub meter_reading_day_completeness: Option<f64>,
    #[serde(default)]
    pub gas_excluded: Option<bool>,
}

impl MonthSummary {
    /// Difference between actual and expected costs up to the last meter
    /// reading date. Positive when the site runs more expensive than
    /// expected.
    #[must_use]
    pub fn difference_until_last_meter_reading_date(&self) -> Option<f64> {
        let actual = self.actual_costs_until_last_meter_reading_date?;
        let expected = self.expected_costs_until_last_meter_reading_date?;
        Some(actual - expected)
    }
}

impl Decodable for MonthSummary {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        decode_data_field(envelope, "monthSummary")
    }
}

//! Usage-and-costs models for the `PeriodUsageAndCosts` query.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_data_field, Decodable};
use crate::error::FrankEnergieError;

/// Usage and costs for one interval within the requested period.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageItem {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub till: Option<String>,
    #[serde(default)]
    pub usage: f64,
    #[serde(default)]
    pub costs: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Totals and per-interval breakdown for one energy segment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyCategory {
    #[serde(default)]
    pub usage_total: Option<f64>,
    #[serde(default)]
    pub costs_total: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub items: Vec<UsageItem>,
}

/// Usage and costs for a period and delivery site, the invoice-grade
/// market-price-plus breakdown.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodUsageAndCosts {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub electricity: Option<EnergyCategory>,
    #[serde(default)]
    pub gas: Option<EnergyCategory>,
    #[serde(default)]
    pub feed_in: Option<EnergyCategory>,
}

impl Decodable for PeriodUsageAndCosts {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        decode_data_field(envelope, "periodUsageAndCosts")
    }
}

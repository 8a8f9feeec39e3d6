//! Account models for the `Me`, `UserSites`, and `UserCountry` queries.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_data_field, Decodable};
use crate::error::FrankEnergieError;

/// Postal address of a delivery site.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// A delivery site attached to the account.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySite {
    /// Opaque site reference used as a variable in site-scoped queries.
    pub reference: String,
    /// Delivery status, e.g. `"IN_DELIVERY"`.
    #[serde(default)]
    pub status: Option<String>,
    /// Energy segments delivered at this site, e.g. `["ELECTRICITY", "GAS"]`.
    #[serde(default)]
    pub segments: Vec<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub delivery_start_date: Option<String>,
    #[serde(default)]
    pub delivery_end_date: Option<String>,
    #[serde(default)]
    pub first_meter_reading_date: Option<String>,
    #[serde(default)]
    pub last_meter_reading_date: Option<String>,
}

/// The delivery sites of the authenticated account.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserSites {
    pub delivery_sites: Vec<DeliverySite>,
}

impl UserSites {
    /// Sites currently in delivery.
    #[must_use]
    pub fn in_delivery(&self) -> Vec<&DeliverySite> {
        self.delivery_sites
            .iter()
            .filter(|site| site.status.as_deref() == Some("IN_DELIVERY"))
            .collect()
    }
}

impl Decodable for UserSites {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        let delivery_sites = decode_data_field(envelope, "userSites")?;
        Ok(Self { delivery_sites })
    }
}

/// The authenticated account as returned by the `Me` query.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// ISO country code of the account, e.g. `"NL"` or `"BE"`.
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub advanced_payment_amount: Option<f64>,
    #[serde(default)]
    pub trees_count: Option<i64>,
    #[serde(default)]
    pub has_co2_compensation: Option<bool>,
}

impl Decodable for Me {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        decode_data_field(envelope, "me")
    }
}

/// Richer account details decoded from the same `Me` operation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub advanced_payment_amount: Option<f64>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Decodable for User {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        decode_data_field(envelope, "me")
    }
}

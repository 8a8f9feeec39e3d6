//! Market-price models for the three `MarketPrices` query variants.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{data_field, decode_value, Decodable};
use crate::error::FrankEnergieError;

/// One hourly (electricity) or daily (gas) price entry.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Start of the validity window.
    #[serde(rename = "from")]
    pub date_from: DateTime<Utc>,
    /// End of the validity window.
    #[serde(rename = "till")]
    pub date_till: DateTime<Utc>,
    /// Raw market price, excluding tax and markups.
    #[serde(default)]
    pub market_price: f64,
    #[serde(default)]
    pub market_price_tax: f64,
    #[serde(default)]
    pub sourcing_markup_price: f64,
    #[serde(default)]
    pub energy_tax_price: f64,
    /// Billing unit, e.g. `"kWh"` or `"m3"`.
    #[serde(default)]
    pub per_unit: Option<String>,
}

impl Price {
    /// Market price including tax.
    #[must_use]
    pub fn market_price_including_tax(&self) -> f64 {
        self.market_price + self.market_price_tax
    }

    /// Market price including tax and sourcing markup.
    #[must_use]
    pub fn market_price_including_tax_and_markup(&self) -> f64 {
        self.market_price + self.market_price_tax + self.sourcing_markup_price
    }

    /// All-in price: market price, tax, markup, and energy tax.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.market_price + self.market_price_tax + self.sourcing_markup_price + self.energy_tax_price
    }
}

/// An ordered series of price entries for one energy segment.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PriceData {
    pub all: Vec<Price>,
}

impl PriceData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Average all-in price over the series, or `None` for an empty series.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_total(&self) -> Option<f64> {
        if self.all.is_empty() {
            return None;
        }
        Some(self.all.iter().map(Price::total).sum::<f64>() / self.all.len() as f64)
    }

    /// The entry whose validity window contains `at`.
    #[must_use]
    pub fn price_at(&self, at: DateTime<Utc>) -> Option<&Price> {
        self.all
            .iter()
            .find(|price| price.date_from <= at && at < price.date_till)
    }
}

/// Electricity and gas market prices for a requested period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketPrices {
    pub electricity: PriceData,
    pub gas: PriceData,
}

/// The server answers an out-of-range price request with this error prefix
/// and no data; it decodes to an empty-but-valid result.
fn no_prices_for_segment(envelope: &Value) -> bool {
    envelope
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|entry| entry.get("message"))
        .and_then(Value::as_str)
        .is_some_and(|message| message.starts_with("No marketprices found for segment"))
}

fn segment(envelope: &Value, container: Option<&str>, field: &str) -> Result<PriceData, FrankEnergieError> {
    let located = match container {
        Some(container) => data_field(envelope, container).and_then(|value| value.get(field)),
        None => data_field(envelope, field),
    };
    located
        .filter(|value| !value.is_null())
        .map_or_else(|| Ok(PriceData::default()), |value| decode_value(value, field))
}

impl MarketPrices {
    /// Decodes the per-user `customerMarketPrices` response.
    ///
    /// # Errors
    ///
    /// Returns [`FrankEnergieError::Request`] for a malformed price list.
    pub fn from_user_envelope(envelope: &Value) -> Result<Self, FrankEnergieError> {
        if no_prices_for_segment(envelope) {
            return Ok(Self::default());
        }
        Ok(Self {
            electricity: segment(envelope, Some("customerMarketPrices"), "electricityPrices")?,
            gas: segment(envelope, Some("customerMarketPrices"), "gasPrices")?,
        })
    }

    /// Decodes the Belgian `marketPrices` response.
    ///
    /// # Errors
    ///
    /// Returns [`FrankEnergieError::Request`] for a malformed price list.
    pub fn from_be_envelope(envelope: &Value) -> Result<Self, FrankEnergieError> {
        if no_prices_for_segment(envelope) {
            return Ok(Self::default());
        }
        Ok(Self {
            electricity: segment(envelope, Some("marketPrices"), "electricityPrices")?,
            gas: segment(envelope, Some("marketPrices"), "gasPrices")?,
        })
    }
}

impl Decodable for MarketPrices {
    /// Decodes the general `marketPricesElectricity`/`marketPricesGas`
    /// response.
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        if no_prices_for_segment(envelope) {
            return Ok(Self::default());
        }
        Ok(Self {
            electricity: segment(envelope, None, "marketPricesElectricity")?,
            gas: segment(envelope, None, "marketPricesGas")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price_entry(from: &str, till: &str, market: f64) -> Value {
        json!({
            "from": from,
            "till": till,
            "marketPrice": market,
            "marketPriceTax": 0.021,
            "sourcingMarkupPrice": 0.017,
            "energyTaxPrice": 0.109,
            "perUnit": "kWh"
        })
    }

    #[test]
    fn test_decode_general_prices() {
        let envelope = json!({
            "data": {
                "marketPricesElectricity": [
                    price_entry("2024-03-01T00:00:00.000Z", "2024-03-01T01:00:00.000Z", 0.10),
                    price_entry("2024-03-01T01:00:00.000Z", "2024-03-01T02:00:00.000Z", 0.12)
                ],
                "marketPricesGas": [
                    price_entry("2024-03-01T00:00:00.000Z", "2024-03-02T00:00:00.000Z", 0.30)
                ]
            }
        });

        let prices = MarketPrices::decode(&envelope).unwrap();
        assert_eq!(prices.electricity.len(), 2);
        assert_eq!(prices.gas.len(), 1);

        let first = &prices.electricity.all[0];
        assert!((first.total() - 0.247).abs() < 1e-9);
        assert!((first.market_price_including_tax() - 0.121).abs() < 1e-9);
    }

    #[test]
    fn test_decode_user_prices() {
        let envelope = json!({
            "data": {
                "customerMarketPrices": {
                    "electricityPrices": [
                        price_entry("2024-03-01T00:00:00.000Z", "2024-03-01T01:00:00.000Z", 0.10)
                    ],
                    "gasPrices": []
                }
            }
        });

        let prices = MarketPrices::from_user_envelope(&envelope).unwrap();
        assert_eq!(prices.electricity.len(), 1);
        assert!(prices.gas.is_empty());
    }

    #[test]
    fn test_decode_be_prices() {
        let envelope = json!({
            "data": {
                "marketPrices": {
                    "electricityPrices": [
                        price_entry("2024-03-01T00:00:00.000Z", "2024-03-01T01:00:00.000Z", 0.10)
                    ],
                    "gasPrices": [
                        price_entry("2024-03-01T00:00:00.000Z", "2024-03-02T00:00:00.000Z", 0.30)
                    ]
                }
            }
        });

        let prices = MarketPrices::from_be_envelope(&envelope).unwrap();
        assert_eq!(prices.electricity.len(), 1);
        assert_eq!(prices.gas.len(), 1);
    }

    #[test]
    fn test_no_marketprices_error_decodes_to_empty() {
        let envelope = json!({
            "errors": [{"message": "No marketprices found for segment GAS"}]
        });

        let prices = MarketPrices::decode(&envelope).unwrap();
        assert!(prices.electricity.is_empty());
        assert!(prices.gas.is_empty());
        assert_eq!(prices.electricity.average_total(), None);
    }

    #[test]
    fn test_price_at_selects_containing_window() {
        let envelope = json!({
            "data": {
                "marketPricesElectricity": [
                    price_entry("2024-03-01T00:00:00.000Z", "2024-03-01T01:00:00.000Z", 0.10),
                    price_entry("2024-03-01T01:00:00.000Z", "2024-03-01T02:00:00.000Z", 0.12)
                ],
                "marketPricesGas": []
            }
        });
        let prices = MarketPrices::decode(&envelope).unwrap();

        let at = "2024-03-01T01:30:00Z".parse().unwrap();
        let hit = prices.electricity.price_at(at).unwrap();
        assert!((hit.market_price - 0.12).abs() < 1e-9);

        let miss = "2024-03-01T02:30:00Z".parse().unwrap();
        assert!(prices.electricity.price_at(miss).is_none());
    }
}

//! Invoice models for the `Invoices` query.

use serde::Deserialize;
use serde_json::Value;

use super::{decode_data_field, Decodable};
use crate::error::FrankEnergieError;

/// A single billing-period invoice.
///
/// The vendor serializes these fields in PascalCase, unlike the rest of the
/// schema.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Invoice {
    /// First day of the billing period, `YYYY-MM-DD`.
    #[serde(rename = "StartDate")]
    pub start_date: String,
    /// Human-readable period label, e.g. `"Maart 2024"`.
    #[serde(rename = "PeriodDescription", default)]
    pub period_description: Option<String>,
    /// Invoiced amount in euros.
    #[serde(rename = "TotalAmount", default)]
    pub total_amount: f64,
}

impl Invoice {
    fn year(&self) -> Option<i32> {
        self.start_date.get(..4)?.parse().ok()
    }
}

/// Invoices across the historical, current, and upcoming billing periods.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoices {
    #[serde(default)]
    pub all_periods_invoices: Vec<Invoice>,
    #[serde(default)]
    pub previous_period_invoice: Option<Invoice>,
    #[serde(default)]
    pub current_period_invoice: Option<Invoice>,
    #[serde(default)]
    pub upcoming_period_invoice: Option<Invoice>,
}

impl Invoices {
    /// All invoices whose billing period starts in the given year.
    #[must_use]
    pub fn invoices_for_year(&self, year: i32) -> Vec<&Invoice> {
        self.all_periods_invoices
            .iter()
            .filter(|invoice| invoice.year() == Some(year))
            .collect()
    }

    /// Sum of invoiced amounts for the given year.
    #[must_use]
    pub fn total_costs(&self, year: i32) -> f64 {
        self.invoices_for_year(year)
            .iter()
            .map(|invoice| invoice.total_amount)
            .sum()
    }
}

impl Decodable for Invoices {
    fn decode(envelope: &Value) -> Result<Self, FrankEnergieError> {
        decode_data_field(envelope, "invoices")
    }
}

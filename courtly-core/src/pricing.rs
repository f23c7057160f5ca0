use serde::{Deserialize, Serialize};

use crate::intent::CheckoutIntent;

pub const PRODUCT_NAME: &str = "Badminton Court Reservation";

/// Currencies whose smallest provider unit is one major unit.
pub const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "IDR", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

pub fn is_zero_decimal_currency(currency: &str) -> bool {
    let upper = currency.trim().to_ascii_uppercase();
    ZERO_DECIMAL_CURRENCIES.contains(&upper.as_str())
}

/// Converts a major-unit price into the provider's minor units.
pub fn unit_amount(price_per_slot: i64, currency: &str) -> i64 {
    if is_zero_decimal_currency(currency) {
        price_per_slot
    } else {
        price_per_slot.saturating_mul(100)
    }
}

/// A single priced line on a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    /// Minor units.
    pub unit_amount: i64,
    /// Lower-case ISO code.
    pub currency: String,
}

impl LineItem {
    pub fn total(&self) -> i64 {
        self.unit_amount.saturating_mul(self.quantity)
    }
}

/// Flat per-slot pricing taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPricing {
    /// Major units.
    pub price_per_slot: i64,
    pub currency: String,
}

impl SlotPricing {
    pub fn new(price_per_slot: i64, currency: impl Into<String>) -> Self {
        Self {
            price_per_slot,
            currency: currency.into(),
        }
    }

    pub fn unit_amount(&self) -> i64 {
        unit_amount(self.price_per_slot, &self.currency)
    }

    /// One line item covering every slot of the intent.
    pub fn line_item(&self, intent: &CheckoutIntent) -> LineItem {
        LineItem {
            name: PRODUCT_NAME.to_string(),
            description: intent.description(),
            quantity: intent.timeslots.len() as i64,
            unit_amount: self.unit_amount(),
            currency: self.currency.trim().to_ascii_lowercase(),
        }
    }
}

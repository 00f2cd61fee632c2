use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fraction digits kept for unit prices.
pub const PRICE_SCALE: u32 = 2;

/// Largest quantity a stock line may hold (2^53). Worksheet cells store numbers as
/// `f64`, which represents whole numbers exactly only up to this bound.
pub const MAX_QUANTITY: u64 = 1 << 53;

/// Compare two item names the way the inventory does (Unicode lowercase).
///
/// The displayed spelling is never changed by a match; this is only used for lookup.
pub fn item_names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// A single stock line: name, on-hand quantity and the current unit price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u64,
    pub unit_price: Decimal,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: u64, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price: normalize_price(unit_price),
        }
    }

    pub fn display_row(&self) -> DisplayRow {
        DisplayRow {
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Round to [`PRICE_SCALE`] fraction digits and fix the scale so `0.1` and `0.10`
/// compare and render the same.
pub(crate) fn normalize_price(price: Decimal) -> Decimal {
    let mut price = price.round_dp(PRICE_SCALE);
    price.rescale(PRICE_SCALE);
    price
}

/// Structured row handed to presentation layers.
///
/// `Display` renders the list form `"{name} - {quantity} - {price}"` with the price at two
/// fraction digits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub name: String,
    pub quantity: u64,
    pub unit_price: Decimal,
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {:.2}",
            self.name,
            self.quantity,
            normalize_price(self.unit_price)
        )
    }
}

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Action tag written for every consumption history row.
pub const CONSUMED_ACTION: &str = "Consumed";

/// `chrono` format string used for history timestamps (`YYYY-MM-DD HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a successful consumption did to the stored item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsumptionOutcome {
    /// The item is still stocked with `remaining` units.
    PartiallyConsumed { remaining: u64 },
    /// The item reached zero and was removed.
    Depleted,
}

/// One immutable entry of the consumption history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// Item name as stored (not as typed by the consumer).
    pub item: String,
    pub quantity: u64,
    pub consumer: String,
    pub timestamp: NaiveDateTime,
    /// Unit price before the consumption was applied.
    pub unit_price: Decimal,
}

impl ConsumptionRecord {
    pub fn action(&self) -> &'static str {
        CONSUMED_ACTION
    }

    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Result of [`crate::InventoryStore::consume`]: the outcome plus the emitted record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    pub outcome: ConsumptionOutcome,
    pub record: ConsumptionRecord,
}

impl Consumption {
    pub fn is_depleted(&self) -> bool {
        matches!(self.outcome, ConsumptionOutcome::Depleted)
    }
}

//! `stockbook-model` defines the in-memory inventory data structures.
//!
//! The crate has no knowledge of how inventory is persisted so it can be reused by:
//! - the `.xlsx` ledger layer (`stockbook-xlsx`)
//! - the interactive shell, which only converts to/from display text at its boundary

mod consumption;
mod error;
mod input;
mod item;
mod store;

pub use consumption::{
    Consumption, ConsumptionOutcome, ConsumptionRecord, CONSUMED_ACTION, TIMESTAMP_FORMAT,
};
pub use error::{ConsumeError, Field, InputError};
pub use input::{parse_price, parse_quantity, ConsumeInput, ItemInput};
pub use item::{item_names_match, DisplayRow, InventoryItem, MAX_QUANTITY, PRICE_SCALE};
pub use store::InventoryStore;

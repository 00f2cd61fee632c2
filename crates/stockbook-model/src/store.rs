use chrono::{Local, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::consumption::{Consumption, ConsumptionOutcome, ConsumptionRecord};
use crate::error::{ConsumeError, Field, InputError};
use crate::item::{item_names_match, normalize_price, DisplayRow, InventoryItem, MAX_QUANTITY};

/// The live working set of inventory lines, in first-seen order.
///
/// Invariants:
/// - at most one item per case-insensitive name
/// - every stored item has a quantity of at least one (depleted items are removed)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStore {
    items: Vec<InventoryItem>,
    /// Records emitted by successful consumptions during this session (append-only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    consumption_log: Vec<ConsumptionRecord>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a sequence of items using add-or-merge semantics, so duplicate
    /// names collapse into a single line.
    pub fn from_items(items: impl IntoIterator<Item = InventoryItem>) -> Result<Self, InputError> {
        let mut store = Self::new();
        for item in items {
            store.add_or_merge(&item.name, item.quantity, item.unit_price)?;
        }
        Ok(store)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the item matching `name` case-insensitively.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item_names_match(&item.name, name))
    }

    pub fn get(&self, name: &str) -> Option<&InventoryItem> {
        self.position(name).map(|idx| &self.items[idx])
    }

    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.items.iter().map(InventoryItem::display_row).collect()
    }

    /// Records emitted by successful consumptions, oldest first.
    pub fn consumption_log(&self) -> &[ConsumptionRecord] {
        &self.consumption_log
    }

    /// Add stock, merging into an existing line with the same (case-insensitive) name.
    ///
    /// On merge the quantities accumulate and the incoming price replaces the stored one;
    /// the line keeps its position and original spelling.
    pub fn add_or_merge(
        &mut self,
        name: &str,
        quantity: u64,
        unit_price: Decimal,
    ) -> Result<(), InputError> {
        if name.trim().is_empty() {
            return Err(InputError::MissingField(Field::Item));
        }
        if quantity == 0 {
            return Err(InputError::InvalidQuantity(quantity.to_string()));
        }
        if quantity > MAX_QUANTITY {
            return Err(InputError::QuantityTooLarge {
                quantity: quantity.to_string(),
                max: MAX_QUANTITY,
            });
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(InputError::InvalidPrice(unit_price.to_string()));
        }

        match self.position(name) {
            Some(idx) => {
                let item = &mut self.items[idx];
                let total = item.quantity + quantity;
                if total > MAX_QUANTITY {
                    return Err(InputError::QuantityOverflow {
                        name: item.name.clone(),
                        max: MAX_QUANTITY,
                    });
                }
                item.quantity = total;
                item.unit_price = normalize_price(unit_price.abs());
                log::debug!(
                    "merged {quantity} into `{}` (now {} @ {})",
                    item.name,
                    item.quantity,
                    item.unit_price
                );
            }
            None => {
                log::debug!("added `{name}` ({quantity} @ {unit_price})");
                self.items
                    .push(InventoryItem::new(name, quantity, unit_price.abs()));
            }
        }
        Ok(())
    }

    /// Consume stock, timestamping the record with the current local time.
    pub fn consume(
        &mut self,
        name: &str,
        quantity: u64,
        consumer: &str,
    ) -> Result<Consumption, ConsumeError> {
        let now = Local::now().naive_local();
        let now = now.with_nanosecond(0).unwrap_or(now);
        self.consume_at(name, quantity, consumer, now)
    }

    /// Like [`InventoryStore::consume`], with a caller-supplied timestamp.
    pub fn consume_at(
        &mut self,
        name: &str,
        quantity: u64,
        consumer: &str,
        timestamp: NaiveDateTime,
    ) -> Result<Consumption, ConsumeError> {
        if name.trim().is_empty() {
            return Err(InputError::MissingField(Field::Item).into());
        }
        if consumer.trim().is_empty() {
            return Err(InputError::MissingField(Field::Consumer).into());
        }
        if quantity == 0 {
            return Err(InputError::InvalidQuantity(quantity.to_string()).into());
        }

        let idx = self
            .position(name)
            .ok_or_else(|| ConsumeError::ItemNotFound(name.to_string()))?;
        let item = &self.items[idx];

        if item.quantity < quantity {
            return Err(ConsumeError::InsufficientQuantity {
                name: item.name.clone(),
                available: item.quantity,
                requested: quantity,
            });
        }

        let record = ConsumptionRecord {
            item: item.name.clone(),
            quantity,
            consumer: consumer.to_string(),
            timestamp,
            unit_price: item.unit_price,
        };

        let outcome = if item.quantity == quantity {
            self.items.remove(idx);
            ConsumptionOutcome::Depleted
        } else {
            let item = &mut self.items[idx];
            item.quantity -= quantity;
            ConsumptionOutcome::PartiallyConsumed {
                remaining: item.quantity,
            }
        };

        log::debug!(
            "{} consumed {} of `{}` ({outcome:?})",
            record.consumer,
            record.quantity,
            record.item
        );
        self.consumption_log.push(record.clone());
        Ok(Consumption { outcome, record })
    }
}

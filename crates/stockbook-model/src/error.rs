use core::fmt;

use thiserror::Error;

/// Input field of the add/consume forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Item,
    Quantity,
    Price,
    Consumer,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Item => f.write_str("item"),
            Field::Quantity => f.write_str("quantity"),
            Field::Price => f.write_str("price"),
            Field::Consumer => f.write_str("consumer"),
        }
    }
}

/// Errors raised when user input cannot be turned into a valid inventory mutation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0} must be filled in")]
    MissingField(Field),
    #[error("quantity must be a positive whole number, got `{0}`")]
    InvalidQuantity(String),
    #[error("price must be a non-negative number, got `{0}`")]
    InvalidPrice(String),
    #[error("quantity must be at most {max}, got `{quantity}`")]
    QuantityTooLarge { quantity: String, max: u64 },
    #[error("quantity of `{name}` would exceed {max}")]
    QuantityOverflow { name: String, max: u64 },
}

/// Errors raised by [`crate::InventoryStore::consume`].
///
/// A failed consumption never mutates the store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConsumeError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error("item `{0}` not found in inventory")]
    ItemNotFound(String),
    #[error("consumption of {requested} `{name}` exceeds available quantity {available}")]
    InsufficientQuantity {
        name: String,
        available: u64,
        requested: u64,
    },
}

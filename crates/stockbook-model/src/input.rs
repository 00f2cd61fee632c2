//! Conversion of raw form text into typed inventory inputs.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Field, InputError};
use crate::item::{normalize_price, MAX_QUANTITY};

/// Parsed fields of the "add item" form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub quantity: u64,
    pub unit_price: Decimal,
}

impl ItemInput {
    /// Parse the three add-form fields. The item name is kept exactly as typed.
    pub fn parse(name: &str, quantity: &str, price: &str) -> Result<Self, InputError> {
        require(name, Field::Item)?;
        require(quantity, Field::Quantity)?;
        require(price, Field::Price)?;

        Ok(Self {
            name: name.to_string(),
            quantity: parse_quantity(quantity)?,
            unit_price: parse_price(price)?,
        })
    }
}

/// Parsed fields of the consumption form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumeInput {
    pub name: String,
    pub quantity: u64,
    pub consumer: String,
}

impl ConsumeInput {
    pub fn parse(name: &str, quantity: &str, consumer: &str) -> Result<Self, InputError> {
        require(name, Field::Item)?;
        require(quantity, Field::Quantity)?;
        require(consumer, Field::Consumer)?;

        Ok(Self {
            name: name.to_string(),
            quantity: parse_quantity(quantity)?,
            consumer: consumer.to_string(),
        })
    }
}

fn require(text: &str, field: Field) -> Result<(), InputError> {
    if text.trim().is_empty() {
        return Err(InputError::MissingField(field));
    }
    Ok(())
}

/// Parse a positive whole quantity no larger than [`MAX_QUANTITY`]. Surrounding
/// whitespace is ignored.
pub fn parse_quantity(text: &str) -> Result<u64, InputError> {
    match text.trim().parse::<u64>() {
        Ok(quantity) if quantity > MAX_QUANTITY => Err(InputError::QuantityTooLarge {
            quantity: text.trim().to_string(),
            max: MAX_QUANTITY,
        }),
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(InputError::InvalidQuantity(text.to_string())),
    }
}

/// Parse a non-negative unit price and round it to cents.
///
/// Accepts plain (`12`, `0.10`, `.5`, `5.`) and scientific (`1e-1`) notation.
pub fn parse_price(text: &str) -> Result<Decimal, InputError> {
    let invalid = || InputError::InvalidPrice(text.to_string());

    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !unsigned.contains(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let price = if unsigned.contains(['e', 'E']) {
        Decimal::from_scientific(unsigned).map_err(|_| invalid())?
    } else {
        let mut plain = unsigned.to_string();
        if plain.starts_with('.') || plain.starts_with("-.") {
            plain = plain.replacen('.', "0.", 1);
        }
        if plain.ends_with('.') {
            plain.push('0');
        }
        Decimal::from_str(&plain).map_err(|_| invalid())?
    };

    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid());
    }
    Ok(normalize_price(price.abs()))
}

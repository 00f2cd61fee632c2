//! Mapping between ledger rows and model types.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use stockbook_model::{parse_price, ConsumptionRecord, InventoryItem, MAX_QUANTITY};

use crate::document::CellValue;

/// Columns of the "Current Inventory" sheet.
pub(crate) const INVENTORY_COLUMNS: usize = 3;
pub(crate) const QUANTITY_COL: usize = 1;
pub(crate) const PRICE_COL: usize = 2;

/// Why a data row could not be read; turned into `LedgerError::MalformedRow` by the caller.
pub(crate) type RowDefect = String;

pub(crate) enum DecodedRow {
    Blank,
    /// The row is well formed but records zero stock.
    Empty { name: String },
    Item(InventoryItem),
}

pub(crate) fn decode_inventory_row(cells: &[CellValue]) -> Result<DecodedRow, RowDefect> {
    if cells.iter().all(CellValue::is_empty) {
        return Ok(DecodedRow::Blank);
    }

    if let Some(extra) = cells
        .iter()
        .skip(INVENTORY_COLUMNS)
        .rposition(|cell| !cell.is_empty())
    {
        return Err(format!(
            "expected {INVENTORY_COLUMNS} columns, found {}",
            INVENTORY_COLUMNS + extra + 1
        ));
    }

    let name = cells
        .first()
        .and_then(CellValue::as_text)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| "missing item name".to_string())?;

    let quantity = match cells.get(QUANTITY_COL) {
        Some(cell) if !cell.is_empty() => decode_quantity(cell)?,
        _ => return Err(format!("missing quantity for `{name}`")),
    };

    let unit_price = match cells.get(PRICE_COL) {
        Some(cell) if !cell.is_empty() => decode_price(cell)?,
        _ => Decimal::ZERO,
    };

    if quantity == 0 {
        return Ok(DecodedRow::Empty { name });
    }
    Ok(DecodedRow::Item(InventoryItem::new(name, quantity, unit_price)))
}

fn decode_quantity(cell: &CellValue) -> Result<u64, RowDefect> {
    let invalid = || {
        format!("quantity {cell:?} is not a whole number from 0 to {MAX_QUANTITY}")
    };
    match cell {
        CellValue::Number(n) => whole_number(*n).ok_or_else(invalid),
        CellValue::Text(s) => {
            let s = s.trim();
            match s.parse::<u64>() {
                Ok(quantity) => Some(quantity).filter(|q| *q <= MAX_QUANTITY),
                Err(_) => s.parse::<f64>().ok().and_then(whole_number),
            }
            .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn whole_number(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_QUANTITY as f64)
        .then_some(n as u64)
}

fn decode_price(cell: &CellValue) -> Result<Decimal, RowDefect> {
    let invalid = || format!("price {cell:?} is not a non-negative number");
    match cell {
        CellValue::Number(n) if *n >= 0.0 => Decimal::from_f64(*n).ok_or_else(invalid),
        CellValue::Price(p) if !p.is_sign_negative() => Ok(*p),
        CellValue::Text(s) => parse_price(s).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Whether a "Current Inventory" data row belongs to `name` (case-insensitive).
pub(crate) fn row_names_item(cells: &[CellValue], name: &str) -> bool {
    cells
        .first()
        .and_then(CellValue::as_text)
        .is_some_and(|cell_name| stockbook_model::item_names_match(&cell_name, name))
}

pub(crate) fn inventory_row(name: &str, quantity: u64, unit_price: Decimal) -> Vec<CellValue> {
    vec![
        CellValue::Text(name.to_string()),
        CellValue::Number(quantity as f64),
        CellValue::Price(unit_price),
    ]
}

pub(crate) fn history_row(record: &ConsumptionRecord) -> Vec<CellValue> {
    vec![
        CellValue::Text(record.action().to_string()),
        CellValue::Text(record.item.clone()),
        CellValue::Number(record.quantity as f64),
        CellValue::Text(record.consumer.clone()),
        CellValue::Text(record.timestamp_text()),
        CellValue::Price(record.unit_price),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn text_quantities_are_accepted() {
        let row = [text("Bolt"), text("8"), CellValue::Number(0.12)];
        let DecodedRow::Item(item) = decode_inventory_row(&row).unwrap() else {
            panic!("expected an item");
        };
        assert_eq!(item.quantity, 8);
        assert_eq!(item.unit_price.to_string(), "0.12");
    }

    #[test]
    fn extra_columns_are_malformed() {
        let row = [
            text("Bolt"),
            CellValue::Number(1.0),
            CellValue::Number(0.5),
            CellValue::Empty,
            text("stray"),
        ];
        let err = decode_inventory_row(&row).err().unwrap();
        assert_eq!(err, "expected 3 columns, found 5");
    }

    #[test]
    fn missing_quantity_is_malformed() {
        let err = decode_inventory_row(&[text("Bolt")]).err().unwrap();
        assert_eq!(err, "missing quantity for `Bolt`");

        let row = [text("Bolt"), CellValue::Empty, CellValue::Number(0.5)];
        assert!(decode_inventory_row(&row).is_err());
    }

    #[test]
    fn quantities_past_exact_float_range_are_malformed() {
        let row = [text("Bolt"), CellValue::Number(MAX_QUANTITY as f64)];
        assert!(matches!(decode_inventory_row(&row), Ok(DecodedRow::Item(_))));

        let row = [text("Bolt"), CellValue::Number(u64::MAX as f64)];
        assert!(decode_inventory_row(&row).is_err());
        let row = [text("Bolt"), text("9007199254740993")];
        assert!(decode_inventory_row(&row).is_err());
    }

    #[test]
    fn fractional_quantity_is_malformed() {
        let row = [text("Bolt"), CellValue::Number(1.5), CellValue::Number(0.5)];
        assert!(decode_inventory_row(&row).is_err());
    }

    #[test]
    fn missing_price_reads_as_zero() {
        let row = [text("Rag"), CellValue::Number(4.0)];
        let DecodedRow::Item(item) = decode_inventory_row(&row).unwrap() else {
            panic!("expected an item");
        };
        assert!(item.unit_price.is_zero());
    }

    #[test]
    fn blank_and_zero_rows_are_distinguished() {
        assert!(matches!(
            decode_inventory_row(&[CellValue::Empty, text(" ")]),
            Ok(DecodedRow::Blank)
        ));
        assert!(matches!(
            decode_inventory_row(&[text("Glue"), CellValue::Number(0.0)]),
            Ok(DecodedRow::Empty { .. })
        ));
    }
}

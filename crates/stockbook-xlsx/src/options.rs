use serde::{Deserialize, Serialize};

/// Layout of a ledger workbook.
///
/// Column meaning is fixed; only the labels, sheet names and price number format are
/// configurable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerOptions {
    pub inventory_sheet: String,
    pub history_sheet: String,
    /// Labels for the item, quantity and price columns.
    pub inventory_header: [String; 3],
    /// Labels for the action, item, quantity, consumer, date and price columns.
    pub history_header: [String; 6],
    /// Excel number format applied to price cells.
    pub price_number_format: String,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            inventory_sheet: "Current Inventory".to_string(),
            history_sheet: "Consumption History".to_string(),
            inventory_header: ["Item", "Quantity", "Price per Unit"].map(String::from),
            history_header: [
                "Action",
                "Item",
                "Quantity",
                "Consumer",
                "Date",
                "Price per Unit",
            ]
            .map(String::from),
            price_number_format: "0.00".to_string(),
        }
    }
}

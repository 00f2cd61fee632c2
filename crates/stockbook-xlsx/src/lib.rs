//! `.xlsx` persistence for Stockbook inventories.
//!
//! A ledger workbook holds two sheets:
//! - "Current Inventory", rewritten wholesale on every save
//! - "Consumption History", only ever appended to by consumption recording
//!
//! Workbooks are read with `calamine`, rebuilt in memory, written with `rust_xlsxwriter`
//! and committed to disk through a same-directory temp file.

mod commit;
mod document;
mod error;
mod ledger;
mod options;
mod rows;
mod session;

pub use document::{CellValue, LedgerDocument, Sheet};
pub use error::{LedgerError, PersistenceError};
pub use ledger::SpreadsheetLedger;
pub use options::LedgerOptions;
pub use session::Session;

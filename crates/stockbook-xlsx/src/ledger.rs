use std::path::{Path, PathBuf};

use stockbook_model::{Consumption, ConsumptionOutcome, InventoryStore};

use crate::commit::commit_bytes;
use crate::document::{CellValue, LedgerDocument};
use crate::error::LedgerError;
use crate::options::LedgerOptions;
use crate::rows::{
    decode_inventory_row, history_row, inventory_row, row_names_item, DecodedRow, PRICE_COL,
    QUANTITY_COL,
};
use crate::session::Session;

/// Binds an [`InventoryStore`] to a two-sheet ledger workbook.
#[derive(Clone, Debug, Default)]
pub struct SpreadsheetLedger {
    options: LedgerOptions,
}

impl SpreadsheetLedger {
    pub fn new(options: LedgerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }

    /// Hydrate a fresh store from the "Current Inventory" sheet at `path`.
    ///
    /// On success `path` becomes the session's active file. On failure the session is left
    /// as it was. The history sheet is neither read nor required.
    pub fn load(
        &self,
        session: &mut Session,
        path: impl AsRef<Path>,
    ) -> Result<InventoryStore, LedgerError> {
        let path = path.as_ref();
        let doc = open_existing(path)?;

        let sheet_name = &self.options.inventory_sheet;
        let sheet = doc
            .sheet(sheet_name)
            .ok_or_else(|| LedgerError::SheetMissing(sheet_name.clone()))?;

        let mut store = InventoryStore::new();
        for (idx, cells) in sheet.rows().iter().enumerate().skip(1) {
            let malformed = |reason: String| LedgerError::MalformedRow {
                sheet: sheet_name.clone(),
                row: idx + 1,
                reason,
            };

            match decode_inventory_row(cells).map_err(malformed)? {
                DecodedRow::Blank => {}
                DecodedRow::Empty { name } => {
                    log::warn!(
                        "{}: skipping `{name}` with zero quantity (row {})",
                        path.display(),
                        idx + 1
                    );
                }
                DecodedRow::Item(item) => {
                    if store.get(&item.name).is_some() {
                        log::warn!(
                            "{}: merging duplicate row for `{}` (row {})",
                            path.display(),
                            item.name,
                            idx + 1
                        );
                    }
                    store
                        .add_or_merge(&item.name, item.quantity, item.unit_price)
                        .map_err(|err| malformed(err.to_string()))?;
                }
            }
        }

        log::info!("loaded {} item(s) from {}", store.len(), path.display());
        session.associate(path);
        Ok(store)
    }

    /// Flush the store to the session's file (or `path_hint` when no file is active yet).
    ///
    /// "Current Inventory" is replaced wholesale; "Consumption History" is created when
    /// missing and otherwise left untouched. Any failure clears the session's active file so
    /// the next save asks for a destination again.
    pub fn save(
        &self,
        store: &InventoryStore,
        session: &mut Session,
        path_hint: Option<&Path>,
    ) -> Result<(), LedgerError> {
        let dest: PathBuf = session
            .active_file()
            .or(path_hint)
            .map(Path::to_path_buf)
            .ok_or(LedgerError::NoDestination)?;
        session.associate(&dest);

        match self.write_inventory(store, &dest) {
            Ok(()) => {
                log::info!("saved {} item(s) to {}", store.len(), dest.display());
                Ok(())
            }
            Err(err) => {
                log::warn!("save to {} failed: {err}", dest.display());
                session.clear();
                Err(err)
            }
        }
    }

    fn write_inventory(&self, store: &InventoryStore, dest: &Path) -> Result<(), LedgerError> {
        let mut doc = if dest.exists() {
            LedgerDocument::open(dest).map_err(|err| LedgerError::persistence(dest, err))?
        } else {
            LedgerDocument::new()
        };

        let options = &self.options;
        let inventory = doc.ensure_sheet(&options.inventory_sheet, &options.inventory_header);
        inventory.truncate_to_header();
        if inventory.row_count() == 0 {
            inventory.push_row(
                options
                    .inventory_header
                    .iter()
                    .cloned()
                    .map(CellValue::Text)
                    .collect(),
            );
        }
        for item in store.items() {
            inventory.push_row(inventory_row(&item.name, item.quantity, item.unit_price));
        }

        doc.ensure_sheet(&options.history_sheet, &options.history_header);

        self.commit(&doc, dest)
    }

    /// Mirror a consumption that was already applied to the in-memory store into the
    /// session's workbook, and append its history row.
    ///
    /// The inventory row is found by scanning item names in the file, not by the item's
    /// position in the store, so unsaved additions and reordered files are handled:
    /// - partial consumption updates the row's quantity, appending the row if the item has
    ///   never been saved
    /// - depletion deletes the row if present
    ///
    /// Duplicate rows for one item (which `load` merges) collapse into the first one, so the
    /// file reloads to the same store.
    pub fn record_consumption(
        &self,
        session: &Session,
        consumption: &Consumption,
    ) -> Result<(), LedgerError> {
        let path = session.active_file().ok_or(LedgerError::NoActiveFile)?;
        let mut doc = open_existing(path)?;

        let options = &self.options;
        if doc.sheet(&options.history_sheet).is_none() {
            return Err(LedgerError::SheetMissing(options.history_sheet.clone()));
        }
        let inventory = doc
            .sheet_mut(&options.inventory_sheet)
            .ok_or_else(|| LedgerError::SheetMissing(options.inventory_sheet.clone()))?;

        let record = &consumption.record;
        let matching: Vec<usize> = inventory
            .rows()
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, cells)| row_names_item(cells, &record.item))
            .map(|(idx, _)| idx)
            .collect();
        let row_idx = matching.first().copied();

        match (consumption.outcome, row_idx) {
            (ConsumptionOutcome::PartiallyConsumed { remaining }, Some(idx)) => {
                inventory.set_cell(idx, QUANTITY_COL, CellValue::Number(remaining as f64));
                if matching.len() > 1 {
                    log::warn!(
                        "collapsing {} rows for `{}` in {}",
                        matching.len(),
                        record.item,
                        path.display()
                    );
                    inventory.set_cell(idx, PRICE_COL, CellValue::Price(record.unit_price));
                    for dup in matching[1..].iter().rev() {
                        inventory.remove_row(*dup);
                    }
                }
            }
            (ConsumptionOutcome::PartiallyConsumed { remaining }, None) => {
                log::warn!(
                    "`{}` has no row in {}; appending it with {remaining} remaining",
                    record.item,
                    path.display()
                );
                inventory.push_row(inventory_row(&record.item, remaining, record.unit_price));
            }
            (ConsumptionOutcome::Depleted, Some(_)) => {
                for idx in matching.iter().rev() {
                    inventory.remove_row(*idx);
                }
            }
            (ConsumptionOutcome::Depleted, None) => {
                log::debug!("`{}` depleted before it was ever saved", record.item);
            }
        }

        if let Some(history) = doc.sheet_mut(&options.history_sheet) {
            history.push_row(history_row(record));
        }

        self.commit(&doc, path)?;
        log::info!(
            "recorded consumption of {} `{}` by {} in {}",
            record.quantity,
            record.item,
            record.consumer,
            path.display()
        );
        Ok(())
    }

    fn commit(&self, doc: &LedgerDocument, path: &Path) -> Result<(), LedgerError> {
        let bytes = doc
            .to_xlsx_bytes(&self.options.price_number_format)
            .map_err(|err| LedgerError::persistence(path, err))?;
        commit_bytes(path, &bytes).map_err(|err| LedgerError::persistence(path, err))
    }
}

fn open_existing(path: &Path) -> Result<LedgerDocument, LedgerError> {
    if !path.exists() {
        return Err(LedgerError::FileNotFound(path.to_path_buf()));
    }
    LedgerDocument::open(path).map_err(|err| LedgerError::persistence(path, err))
}

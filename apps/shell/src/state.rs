use std::fmt;
use std::path::Path;

use stockbook_model::{
    ConsumeError, ConsumeInput, Consumption, ConsumptionOutcome, DisplayRow, InputError,
    InventoryStore, ItemInput,
};
use stockbook_xlsx::{LedgerError, Session, SpreadsheetLedger};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Consume(#[from] ConsumeError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("operation cancelled")]
    Cancelled,
}

/// Confirmation returned by a successful [`AppState::consume_item`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumptionReport {
    pub consumption: Consumption,
}

impl fmt::Display for ConsumptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = &self.consumption.record;
        match self.consumption.outcome {
            ConsumptionOutcome::PartiallyConsumed { .. } => write!(
                f,
                "{} consumed {} of {}.",
                record.consumer, record.quantity, record.item
            ),
            ConsumptionOutcome::Depleted => {
                write!(f, "{} consumed and depleted {}.", record.consumer, record.item)
            }
        }
    }
}

/// Application state for one inventory session.
#[derive(Debug, Default)]
pub struct AppState {
    store: InventoryStore,
    session: Session,
    ledger: SpreadsheetLedger,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: SpreadsheetLedger) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display_rows(&self) -> Vec<DisplayRow> {
        self.store.display_rows()
    }

    /// Whether [`AppState::save_file`] needs a destination chosen by the user.
    pub fn needs_destination(&self) -> bool {
        !self.session.is_active()
    }

    /// Add (or merge) an item from raw form text. Nothing is persisted until the next save.
    pub fn add_item(
        &mut self,
        item_text: &str,
        quantity_text: &str,
        price_text: &str,
    ) -> Result<(), CommandError> {
        let input = ItemInput::parse(item_text, quantity_text, price_text)?;
        self.store
            .add_or_merge(&input.name, input.quantity, input.unit_price)?;
        Ok(())
    }

    /// Replace the working set with the inventory stored at `selected_path`.
    ///
    /// `None` means the file picker was dismissed; nothing changes.
    pub fn load_file(
        &mut self,
        selected_path: Option<&Path>,
    ) -> Result<Vec<DisplayRow>, CommandError> {
        let path = selected_path.ok_or(CommandError::Cancelled)?;
        self.store = self.ledger.load(&mut self.session, path)?;
        Ok(self.store.display_rows())
    }

    /// Save the working set to the session file, or to `selected_path` if no file is
    /// associated yet.
    pub fn save_file(&mut self, selected_path: Option<&Path>) -> Result<(), CommandError> {
        self.ledger
            .save(&self.store, &mut self.session, selected_path)?;
        Ok(())
    }

    /// Consume stock from raw form text and record it in the session file.
    ///
    /// The session file is required up front. If recording fails after the in-memory
    /// consumption succeeded, the store keeps the new quantity.
    pub fn consume_item(
        &mut self,
        item_text: &str,
        quantity_text: &str,
        consumer_text: &str,
    ) -> Result<ConsumptionReport, CommandError> {
        let input = ConsumeInput::parse(item_text, quantity_text, consumer_text)?;
        if !self.session.is_active() {
            return Err(LedgerError::NoActiveFile.into());
        }

        let consumption = self
            .store
            .consume(&input.name, input.quantity, &input.consumer)?;
        if let Err(err) = self.ledger.record_consumption(&self.session, &consumption) {
            log::warn!(
                "`{}` consumed in memory but not recorded: {err}",
                consumption.record.item
            );
            return Err(err.into());
        }
        Ok(ConsumptionReport { consumption })
    }
}

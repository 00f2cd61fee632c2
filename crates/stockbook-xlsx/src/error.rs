use std::path::PathBuf;

use thiserror::Error;

/// Low-level failure while reading, serializing or committing a workbook.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("sheet `{0}` is missing from the workbook")]
    SheetMissing(String),
    #[error("row {row} of sheet `{sheet}` is malformed: {reason}")]
    MalformedRow {
        sheet: String,
        /// 1-based worksheet row number.
        row: usize,
        reason: String,
    },
    #[error("no file selected or created")]
    NoDestination,
    #[error("no file loaded; load or save a file first")]
    NoActiveFile,
    #[error("{}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceError,
    },
}

impl LedgerError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: impl Into<PersistenceError>) -> Self {
        LedgerError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }
}

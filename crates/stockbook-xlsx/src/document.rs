use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};

use crate::error::PersistenceError;

/// Scalar value of a worksheet cell as the ledger sees it.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    /// A monetary amount, written as a number with the ledger's price format.
    Price(Decimal),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form used when a cell is read as an item name.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Price(p) => Some(p.to_string()),
            CellValue::Bool(_) | CellValue::Empty => None,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => CellValue::Empty,
            Data::Int(v) => CellValue::Number(*v as f64),
            Data::Float(v) => CellValue::Number(*v),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}

/// A worksheet as a dense list of rows. Row 0 is worksheet row 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Delete a row, shifting the rows below it up (like Excel's "delete row").
    pub fn remove_row(&mut self, idx: usize) -> Option<Vec<CellValue>> {
        (idx < self.rows.len()).then(|| self.rows.remove(idx))
    }

    /// Set a single cell, growing the grid as needed.
    pub fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    /// Drop every row after the first (the header row).
    pub fn truncate_to_header(&mut self) {
        self.rows.truncate(1);
    }

    fn trim_trailing_empty(&mut self) {
        for row in &mut self.rows {
            while row.last().is_some_and(|cell| matches!(cell, CellValue::Empty)) {
                row.pop();
            }
        }
        while self.rows.last().is_some_and(|row| row.is_empty()) {
            self.rows.pop();
        }
    }
}

/// In-memory copy of a ledger workbook, preserving sheet order and cell values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerDocument {
    pub sheets: Vec<Sheet>,
}

impl LedgerDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every sheet of an `.xlsx` workbook.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let sheet_names = workbook.sheet_names().to_owned();

        let mut doc = Self::new();
        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name)?;
            let mut sheet = Sheet::new(sheet_name);
            let (start_row, start_col) = range.start().unwrap_or((0, 0));

            for (row, col, value) in range.used_cells() {
                let value = CellValue::from(value);
                if matches!(value, CellValue::Empty) {
                    continue;
                }
                sheet.set_cell(start_row as usize + row, start_col as usize + col, value);
            }
            sheet.trim_trailing_empty();
            doc.sheets.push(sheet);
        }
        Ok(doc)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// Return the named sheet, appending it with `header` as its first row if absent.
    pub fn ensure_sheet(&mut self, name: &str, header: &[String]) -> &mut Sheet {
        let idx = match self.sheets.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                let mut sheet = Sheet::new(name);
                sheet.push_row(header.iter().cloned().map(CellValue::Text).collect());
                self.sheets.push(sheet);
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[idx]
    }

    /// Serialize to `.xlsx` bytes, applying `price_format` to [`CellValue::Price`] cells.
    pub fn to_xlsx_bytes(&self, price_format: &str) -> Result<Vec<u8>, PersistenceError> {
        let mut out = XlsxWorkbook::new();
        let price_format = Format::new().set_num_format(price_format);

        for sheet in &self.sheets {
            let worksheet = out.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (row, cells) in sheet.rows.iter().enumerate() {
                let row = u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)?;
                for (col, value) in cells.iter().enumerate() {
                    let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
                    match value {
                        CellValue::Empty => {}
                        CellValue::Number(n) => {
                            worksheet.write_number(row, col, *n)?;
                        }
                        CellValue::Price(p) => {
                            let n = p.to_f64().unwrap_or_default();
                            worksheet.write_number_with_format(row, col, n, &price_format)?;
                        }
                        CellValue::Text(s) => {
                            worksheet.write_string(row, col, s)?;
                        }
                        CellValue::Bool(b) => {
                            worksheet.write_boolean(row, col, *b)?;
                        }
                    }
                }
            }
        }

        Ok(out.save_to_buffer()?)
    }
}

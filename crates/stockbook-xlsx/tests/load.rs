mod common;

use std::path::Path;

use common::{price, sheet_names, sheet_text, strings};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use stockbook_model::InventoryItem;
use stockbook_xlsx::{LedgerError, LedgerOptions, Session, SpreadsheetLedger};

/// A workbook laid out the way older ledger files are: a leftover default sheet first and
/// quantities stored as text.
fn write_legacy_workbook(path: &Path, rows: &[(&str, &str, f64)]) {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("Sheet").unwrap();

    let inventory = workbook.add_worksheet();
    inventory.set_name("Current Inventory").unwrap();
    inventory.write_string(0, 0, "Item").unwrap();
    inventory.write_string(0, 1, "Quantity").unwrap();
    inventory.write_string(0, 2, "Price per Unit").unwrap();
    for (i, (item, qty, price)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        inventory.write_string(row, 0, *item).unwrap();
        inventory.write_string(row, 1, *qty).unwrap();
        inventory.write_number(row, 2, *price).unwrap();
    }

    let history = workbook.add_worksheet();
    history.set_name("Consumption History").unwrap();
    for (col, label) in ["Action", "Item", "Quantity", "Consumer", "Date", "Price per Unit"]
        .into_iter()
        .enumerate()
    {
        history.write_string(0, col as u16, label).unwrap();
    }
    history.write_string(1, 0, "Consumed").unwrap();
    history.write_string(1, 1, "Glue").unwrap();
    history.write_number(1, 2, 1).unwrap();
    history.write_string(1, 3, "Zed").unwrap();
    history.write_string(1, 4, "2023-12-31 23:59:59").unwrap();
    history.write_number(1, 5, 4.25).unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn legacy_text_quantities_load() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("legacy.xlsx");
    write_legacy_workbook(&path, &[("Bolt", "8", 0.12), ("Nut", " 40 ", 0.05)]);

    let store = SpreadsheetLedger::default()
        .load(&mut Session::new(), &path)
        .expect("load");

    assert_eq!(
        store.items(),
        &[
            InventoryItem::new("Bolt", 8, price("0.12")),
            InventoryItem::new("Nut", 40, price("0.05")),
        ]
    );
}

#[test]
fn save_keeps_foreign_sheets_and_existing_history() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("legacy.xlsx");
    write_legacy_workbook(&path, &[("Bolt", "8", 0.12)]);

    let ledger = SpreadsheetLedger::default();
    let mut session = Session::new();
    let mut store = ledger.load(&mut session, &path).expect("load");
    store.add_or_merge("Tape", 3, price("2")).unwrap();
    ledger.save(&store, &mut session, None).expect("save");

    assert_eq!(
        sheet_names(&path),
        strings(&["Sheet", "Current Inventory", "Consumption History"])
    );
    assert_eq!(
        sheet_text(&path, "Current Inventory"),
        vec![
            strings(&["Item", "Quantity", "Price per Unit"]),
            strings(&["Bolt", "8", "0.12"]),
            strings(&["Tape", "3", "2"]),
        ]
    );
    assert_eq!(
        sheet_text(&path, "Consumption History")[1],
        strings(&["Consumed", "Glue", "1", "Zed", "2023-12-31 23:59:59", "4.25"])
    );
}

#[test]
fn duplicate_rows_merge_on_load() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("dupes.xlsx");
    write_legacy_workbook(
        &path,
        &[("Bolt", "8", 0.12), ("Nut", "1", 0.05), ("BOLT", "2", 0.15)],
    );

    let store = SpreadsheetLedger::default()
        .load(&mut Session::new(), &path)
        .expect("load");

    assert_eq!(store.len(), 2);
    assert_eq!(
        store.items()[0],
        InventoryItem::new("Bolt", 10, price("0.15"))
    );
}

#[test]
fn zero_quantity_rows_are_skipped() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("zero.xlsx");
    write_legacy_workbook(&path, &[("Bolt", "0", 0.12), ("Nut", "3", 0.05)]);

    let store = SpreadsheetLedger::default()
        .load(&mut Session::new(), &path)
        .expect("load");

    assert_eq!(store.items(), &[InventoryItem::new("Nut", 3, price("0.05"))]);
}

#[test]
fn missing_file_is_reported_and_session_untouched() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("nope.xlsx");
    let mut session = Session::with_file(tmp.path().join("previous.xlsx"));

    let err = SpreadsheetLedger::default()
        .load(&mut session, &path)
        .unwrap_err();

    assert!(matches!(&err, LedgerError::FileNotFound(p) if p == &path), "{err}");
    assert_eq!(
        session.active_file(),
        Some(tmp.path().join("previous.xlsx").as_path())
    );
}

#[test]
fn missing_inventory_sheet_is_reported() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("other.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet().write_string(0, 0, "hello").unwrap();
    workbook.save(&path).unwrap();

    let mut session = Session::new();
    let err = SpreadsheetLedger::default()
        .load(&mut session, &path)
        .unwrap_err();

    assert!(matches!(&err, LedgerError::SheetMissing(name) if name == "Current Inventory"));
    assert_eq!(
        err.to_string(),
        "sheet `Current Inventory` is missing from the workbook"
    );
    assert!(!session.is_active());
}

#[test]
fn malformed_row_fails_fast() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("bad.xlsx");
    write_legacy_workbook(
        &path,
        &[("Bolt", "8", 0.12), ("Nut", "lots", 0.05), ("Washer", "1", 0.01)],
    );

    let mut session = Session::new();
    let err = SpreadsheetLedger::default()
        .load(&mut session, &path)
        .unwrap_err();

    match err {
        LedgerError::MalformedRow { sheet, row, .. } => {
            assert_eq!(sheet, "Current Inventory");
            assert_eq!(row, 3);
        }
        other => panic!("expected MalformedRow, got {other:?}"),
    }
    assert!(!session.is_active());
}

#[test]
fn custom_layout_is_honored() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("custom.xlsx");
    let options: LedgerOptions = serde_json::from_str(
        r##"{"inventorySheet":"Stock","historySheet":"Usage","priceNumberFormat":"#,##0.00"}"##,
    )
    .expect("options");
    let ledger = SpreadsheetLedger::new(options);

    let mut store = stockbook_model::InventoryStore::new();
    store.add_or_merge("Bolt", 2, price("0.10")).unwrap();
    ledger
        .save(&store, &mut Session::new(), Some(path.as_path()))
        .expect("save");

    assert_eq!(sheet_names(&path), strings(&["Stock", "Usage"]));
    let loaded = ledger.load(&mut Session::new(), &path).expect("load");
    assert_eq!(loaded.items(), store.items());
}

#[test]
fn row_without_quantity_is_malformed() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("short.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Current Inventory").unwrap();
    sheet.write_string(0, 0, "Item").unwrap();
    sheet.write_string(0, 1, "Quantity").unwrap();
    sheet.write_string(0, 2, "Price per Unit").unwrap();
    sheet.write_string(1, 0, "Bolt").unwrap();
    sheet.write_number(1, 1, 8).unwrap();
    sheet.write_number(1, 2, 0.12).unwrap();
    sheet.write_string(2, 0, "Nut").unwrap();
    workbook.save(&path).unwrap();

    let err = SpreadsheetLedger::default()
        .load(&mut Session::new(), &path)
        .unwrap_err();

    match err {
        LedgerError::MalformedRow { sheet, row, reason } => {
            assert_eq!(sheet, "Current Inventory");
            assert_eq!(row, 3);
            assert_eq!(reason, "missing quantity for `Nut`");
        }
        other => panic!("expected MalformedRow, got {other:?}"),
    }
}

#[test]
fn quantity_beyond_exact_range_is_malformed() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let path = tmp.path().join("huge.xlsx");
    write_legacy_workbook(&path, &[("Bolt", "18446744073709551615", 0.12)]);

    let err = SpreadsheetLedger::default()
        .load(&mut Session::new(), &path)
        .unwrap_err();

    assert!(matches!(err, LedgerError::MalformedRow { row: 2, .. }), "{err}");
}

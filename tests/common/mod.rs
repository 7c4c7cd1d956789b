#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use finance_screening::data::{CellValue, Table};
use finance_screening::io_utils::write_table;
use finance_screening::schema::{DuplicateMode, TransformOptions};
use tempfile::{TempDir, tempdir};

pub const TANK: &str = "เลขถัง";
pub const ITEM: &str = "รายการ";
pub const SALE_PRICE: &str = "ราคาขายเดิม";
pub const TOTAL_VALUE: &str = "มูลค่ารวม";
pub const PRODUCT_VALUE: &str = "มูลค่าสินค้า";
pub const TAX: &str = "ภาษี";
pub const COM_FN: &str = "COM F/N";
pub const COM: &str = "COM";

pub const SENT_LABEL: &str = "ส่งไฟแนนซ์";
pub const BROKER_LABEL: &str = "นายหน้าไฟแนนซ์";

pub fn sample_options(duplicate_mode: DuplicateMode) -> TransformOptions {
    TransformOptions {
        duplicate_mode,
        ..TransformOptions::default()
    }
}

/// Two rows for tank ABC123 (one finance-sent, one finance-broker) plus an
/// unrelated XYZ999 row.
pub fn sample_table() -> Table {
    Table::with_rows(
        [
            TANK,
            ITEM,
            SALE_PRICE,
            TOTAL_VALUE,
            PRODUCT_VALUE,
            COM_FN,
            COM,
            TAX,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        vec![
            row("ABC123", SENT_LABEL, 100000.0, 0.0, 933644.86, 0.0, 0.0, 0.0),
            row("ABC123", BROKER_LABEL, 0.0, 0.0, 0.0, 5000.0, 350.0, 0.0),
            row("XYZ999", "อื่นๆ", 80000.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        ],
    )
}

#[allow(clippy::too_many_arguments)]
pub fn row(
    tank: &str,
    item: &str,
    sale_price: f64,
    total_value: f64,
    product_value: f64,
    com_fn: f64,
    com: f64,
    tax: f64,
) -> Vec<CellValue> {
    vec![
        tank.into(),
        item.into(),
        sale_price.into(),
        total_value.into(),
        product_value.into(),
        com_fn.into(),
        com.into(),
        tax.into(),
    ]
}

/// Index of the first row whose `column` displays as `value`.
pub fn find_row(table: &Table, column: &str, value: &str) -> usize {
    let index = table
        .column_index(column)
        .unwrap_or_else(|| panic!("Column '{column}' not found"));
    table
        .rows()
        .iter()
        .position(|row| row[index].as_display() == value)
        .unwrap_or_else(|| panic!("No row with {column} = {value}"))
}

pub fn cell<'a>(table: &'a Table, row: usize, column: &str) -> &'a CellValue {
    table
        .get(row, column)
        .unwrap_or_else(|| panic!("Column '{column}' not found"))
}

pub fn workbook_bytes(table: &Table) -> Vec<u8> {
    write_table(table).expect("write workbook")
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn write_workbook(&self, name: &str, table: &Table) -> PathBuf {
        self.write(name, &workbook_bytes(table))
    }
}

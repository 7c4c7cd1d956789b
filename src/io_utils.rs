//! Spreadsheet boundary: bytes in, [`Table`] out, and back again.
//!
//! Reading goes through `calamine`, which sniffs the workbook format from the
//! content itself; the filename is only used to reject obviously foreign
//! uploads. Writing produces a single `.xlsx` sheet named `result` via
//! `rust_xlsxwriter`.

use std::{collections::HashMap, fs, io::Cursor, iter, path::Path};

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use rust_xlsxwriter::Workbook;
use thiserror::Error;

use crate::data::{CellValue, Table};

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];
pub const RESULT_SHEET_NAME: &str = "result";
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Empty file content.")]
    Empty,
    #[error("Unsupported file type. Use .xls or .xlsx.")]
    UnsupportedType,
    #[error("Unable to read Excel file: {0}")]
    Unreadable(String),
}

/// True when `name` ends in `.xls` or `.xlsx`, ignoring case.
pub fn is_spreadsheet_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{ext}")))
}

fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Reads the first worksheet of an `.xls`/`.xlsx` workbook into a [`Table`].
///
/// The first row supplies column names. Blank header cells become
/// `Unnamed: {position}` and repeated names get a `.{n}` suffix, so every
/// column stays addressable by name.
pub fn read_table(bytes: &[u8], filename: Option<&str>) -> Result<Table, ReadError> {
    if bytes.is_empty() {
        return Err(ReadError::Empty);
    }
    if let Some(ext) = filename.and_then(extension_of)
        && !SUPPORTED_EXTENSIONS.contains(&ext.as_str())
    {
        return Err(ReadError::UnsupportedType);
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|err| ReadError::Unreadable(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReadError::Unreadable("workbook has no sheets".to_string()))?
        .map_err(|err| ReadError::Unreadable(err.to_string()))?;

    // calamine ranges begin at the first used cell; blank leading columns are
    // restored so column positions match the sheet.
    let leading_columns = range.start().map_or(0, |(_, col)| col as usize);
    let mut rows = range.rows().map(|row| anchored_row(row, leading_columns));
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };
    let headers = header_names(&header_row);
    let mut body = rows.collect::<Vec<_>>();
    while body
        .last()
        .is_some_and(|row| row.iter().all(|cell| *cell == CellValue::Empty))
    {
        body.pop();
    }
    Ok(Table::with_rows(headers, body))
}

fn anchored_row(row: &[Data], leading_columns: usize) -> Vec<CellValue> {
    iter::repeat_n(CellValue::Empty, leading_columns)
        .chain(row.iter().map(cell_from_data))
        .collect()
}

fn header_names(row: &[CellValue]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                CellValue::Empty => format!("Unnamed: {idx}"),
                other => other.as_display(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Text(format!("{dt}")),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Serializes a table as a single-sheet `.xlsx` workbook.
pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RESULT_SHEET_NAME)?;

    for (col, name) in table.columns().iter().enumerate() {
        let col = u16::try_from(col).context("Too many columns for an xlsx sheet")?;
        worksheet.write_string(0, col, name)?;
    }
    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1).context("Too many rows for an xlsx sheet")?;
        for (col, cell) in row.iter().enumerate() {
            let col = u16::try_from(col).context("Too many columns for an xlsx sheet")?;
            match cell {
                CellValue::Empty => {}
                CellValue::Number(f) if f.is_nan() => {}
                CellValue::Number(f) => {
                    worksheet.write_number(row_num, col, *f)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
            }
        }
    }

    workbook
        .save_to_buffer()
        .context("Serializing workbook to xlsx")
}

pub fn read_table_from_path(path: &Path) -> Result<Table> {
    let bytes = fs::read(path).with_context(|| format!("Opening input file {path:?}"))?;
    let filename = path.file_name().and_then(|name| name.to_str());
    read_table(&bytes, filename).with_context(|| format!("Reading spreadsheet {path:?}"))
}

pub fn write_table_to_path(table: &Table, path: &Path) -> Result<()> {
    let bytes = write_table(table)?;
    fs::write(path, bytes).with_context(|| format!("Creating output file {path:?}"))
}

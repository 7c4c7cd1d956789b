//! Cell and table model shared by the reader, the rules engine, and the writer.
//!
//! A [`Table`] is an ordered list of column names plus rows of [`CellValue`]s
//! aligned with those columns. Every comparison the engine makes goes through
//! [`normalize_text()`], so `"ABC  123 "`, `"ABC 123"`, and a genuinely empty
//! cell line up the way a person reading the sheet would expect.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn as_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(f) => format_number(*f),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True when the normalized text of this cell is empty.
    pub fn is_blank(&self) -> bool {
        normalize_text(self).is_empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl Serialize for CellValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(f) if f.is_nan() => serializer.serialize_none(),
            CellValue::Number(f) if is_whole(*f) => serializer.serialize_i64(*f as i64),
            CellValue::Number(f) => serializer.serialize_f64(*f),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if is_whole(value) {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// Comparable text form of a cell.
///
/// Empty cells, NaN, and the literal tokens `nan` / `none` (any case) become
/// the empty string. Everything else is trimmed and internal whitespace runs
/// collapse to a single space.
pub fn normalize_text(value: &CellValue) -> String {
    let display = value.as_display();
    let trimmed = display.trim();
    if trimmed.eq_ignore_ascii_case("nan") || trimmed.eq_ignore_ascii_case("none") {
        return String::new();
    }
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First value whose normalized text is non-empty, or an empty text cell.
pub fn first_non_empty<'a, I>(values: I) -> CellValue
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values
        .into_iter()
        .find(|value| !value.is_blank())
        .cloned()
        .unwrap_or_else(|| CellValue::Text(String::new()))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    pub fn value(&self, row: usize, column: usize) -> &CellValue {
        &self.rows[row][column]
    }

    pub fn set_value(&mut self, row: usize, column: usize, value: CellValue) {
        self.rows[row][column] = value;
    }

    /// Looks a cell up by column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Returns the position of `name`, appending an empty column when absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }

    /// Overwrites `name` in place, or appends it when absent.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        let index = self.ensure_column(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
    }

    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    /// Rebuilds the table with columns in `order` (positions into the current columns).
    pub fn reorder(&self, order: &[usize]) -> Table {
        let columns = order.iter().map(|&idx| self.columns[idx].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| order.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    pub fn head(&self, count: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(count).cloned().collect(),
        }
    }
}

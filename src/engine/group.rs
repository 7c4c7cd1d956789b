//! Duplicate tank detection and the `group` duplicate mode.

use std::collections::{HashMap, HashSet};

use crate::data::{CellValue, Table, first_non_empty};

/// Normalized tank numbers that occur on two or more rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSet {
    tanks: HashSet<String>,
    mask: Vec<bool>,
}

impl DuplicateSet {
    pub fn detect(tank_norm: &[String]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tank in tank_norm.iter().filter(|t| !t.is_empty()) {
            *counts.entry(tank.as_str()).or_insert(0) += 1;
        }
        let tanks = counts
            .into_iter()
            .filter(|(_, count)| *count >= 2)
            .map(|(tank, _)| tank.to_string())
            .collect::<HashSet<_>>();
        let mask = tank_norm.iter().map(|t| tanks.contains(t)).collect();
        Self { tanks, mask }
    }

    pub fn contains(&self, tank: &str) -> bool {
        self.tanks.contains(tank)
    }

    /// Per-row flag, true for every occurrence of a duplicated tank.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn group_count(&self) -> usize {
        self.tanks.len()
    }

    pub fn row_count(&self) -> usize {
        self.mask.iter().filter(|flag| **flag).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPolicy {
    Sum,
    FirstNonEmpty,
    LogicalOr,
}

/// Picks one policy per column before any rows are merged. `logical_or` and
/// `first_non_empty` pin specific columns; the rest are summed when every
/// non-blank value is numeric.
pub fn resolve_policies(
    table: &Table,
    logical_or: &[usize],
    first_non_empty: &[usize],
) -> Vec<AggregationPolicy> {
    (0..table.columns().len())
        .map(|column| {
            if logical_or.contains(&column) {
                AggregationPolicy::LogicalOr
            } else if first_non_empty.contains(&column) {
                AggregationPolicy::FirstNonEmpty
            } else if is_numeric_column(table, column) {
                AggregationPolicy::Sum
            } else {
                AggregationPolicy::FirstNonEmpty
            }
        })
        .collect()
}

fn is_numeric_column(table: &Table, column: usize) -> bool {
    let mut saw_number = false;
    for value in table.column_values(column) {
        if value.is_blank() {
            continue;
        }
        if value.as_number().is_none() {
            return false;
        }
        saw_number = true;
    }
    saw_number
}

/// Merges rows sharing a key into one row per key, in first-appearance order.
pub fn group_rows(table: &Table, keys: &[String], policies: &[AggregationPolicy]) -> Table {
    let mut order: Vec<Vec<usize>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        let slot = *positions.entry(key.as_str()).or_insert_with(|| {
            order.push(Vec::new());
            order.len() - 1
        });
        order[slot].push(row);
    }

    let mut grouped = Table::new(table.columns().to_vec());
    for members in &order {
        let row = policies
            .iter()
            .enumerate()
            .map(|(column, policy)| {
                let values = members.iter().map(|&row| table.value(row, column));
                aggregate(*policy, values)
            })
            .collect();
        grouped.push_row(row);
    }
    grouped
}

fn aggregate<'a>(
    policy: AggregationPolicy,
    mut values: impl Iterator<Item = &'a CellValue>,
) -> CellValue {
    match policy {
        AggregationPolicy::FirstNonEmpty => first_non_empty(values),
        AggregationPolicy::LogicalOr => {
            CellValue::Bool(values.any(|value| value.as_bool() == Some(true)))
        }
        AggregationPolicy::Sum => {
            let numbers = values.filter_map(CellValue::as_number).collect::<Vec<_>>();
            if numbers.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Number(numbers.iter().sum())
            }
        }
    }
}

//! Item-driven cell rewrites and the per-tank lookups built from them.

use std::collections::HashMap;

use crate::{
    data::{CellValue, Table, first_non_empty, normalize_text},
    schema::TransformOptions,
    validation::ResolvedColumns,
};

use super::{FINANCE_BROKER, FINANCE_SENT};

/// Which item labels a row matched. Both flags can be set when the two labels
/// are configured identically; the broker rewrite then runs last and wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowClass {
    pub finance_sent: bool,
    pub finance_broker: bool,
}

pub fn classify_rows(
    table: &Table,
    columns: &ResolvedColumns,
    options: &TransformOptions,
) -> Vec<RowClass> {
    table
        .column_values(columns.item)
        .map(|value| {
            let item = normalize_text(value);
            RowClass {
                finance_sent: item == options.finance_sent_item_label,
                finance_broker: item == options.finance_broker_item_label,
            }
        })
        .collect()
}

/// Rewrites mapped cells per row class and records which rule fired in
/// `rule_applied`. Every row's `rule_applied` is reset first, so running the
/// pass again over its own output gives the same result.
pub fn apply_row_rules(
    mut table: Table,
    columns: &ResolvedColumns,
    rule_applied: usize,
    classes: &[RowClass],
) -> Table {
    for (row, class) in classes.iter().enumerate() {
        table.set_value(row, rule_applied, CellValue::text(""));
        if class.finance_sent {
            let sale_price = table.value(row, columns.sale_price).clone();
            table.set_value(row, columns.total_value, sale_price);
            table.set_value(row, rule_applied, CellValue::text(FINANCE_SENT));
        }
        if class.finance_broker {
            let com_fn = table.value(row, columns.com_fn).clone();
            let com = table.value(row, columns.com).clone();
            table.set_value(row, columns.product_value, com_fn);
            table.set_value(row, columns.tax, com);
            table.set_value(row, rule_applied, CellValue::text(FINANCE_BROKER));
        }
    }
    table
}

/// Tank-level values gathered from rewritten rows, keyed by normalized tank number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TankLookups {
    pub sent_price_by_tank: HashMap<String, CellValue>,
    pub broker_comfn_by_tank: HashMap<String, CellValue>,
}

impl TankLookups {
    pub fn build(
        table: &Table,
        columns: &ResolvedColumns,
        tank_norm: &[String],
        classes: &[RowClass],
    ) -> Self {
        let sent_price_by_tank = collect_first_by_tank(
            table,
            tank_norm,
            columns.total_value,
            classes.iter().map(|c| c.finance_sent),
        );
        let broker_comfn_by_tank = collect_first_by_tank(
            table,
            tank_norm,
            columns.product_value,
            classes.iter().map(|c| c.finance_broker),
        );
        Self {
            sent_price_by_tank,
            broker_comfn_by_tank,
        }
    }

    pub fn sent_price(&self, tank: &str) -> CellValue {
        self.sent_price_by_tank
            .get(tank)
            .cloned()
            .unwrap_or_default()
    }

    pub fn broker_com_fn(&self, tank: &str) -> CellValue {
        self.broker_comfn_by_tank
            .get(tank)
            .cloned()
            .unwrap_or_default()
    }
}

fn collect_first_by_tank(
    table: &Table,
    tank_norm: &[String],
    column: usize,
    mask: impl Iterator<Item = bool>,
) -> HashMap<String, CellValue> {
    let mut candidates: HashMap<&str, Vec<&CellValue>> = HashMap::new();
    for (row, selected) in mask.enumerate() {
        if selected {
            candidates
                .entry(tank_norm[row].as_str())
                .or_default()
                .push(table.value(row, column));
        }
    }
    candidates
        .into_iter()
        .map(|(tank, values)| (tank.to_string(), first_non_empty(values)))
        .collect()
}

use crate::data::{CellValue, Table, normalize_text};

use super::{
    COM_FN_LOOKUP, GROUP_ID, IS_DUPLICATE_TANK, RULE_APPLIED, SALE_PRICE_LOOKUP,
    group::DuplicateSet, rules::TankLookups,
};

/// Columns moved to the end of the output, in this order.
pub const TAIL_COLUMNS: [&str; 5] = [
    SALE_PRICE_LOOKUP,
    COM_FN_LOOKUP,
    RULE_APPLIED,
    IS_DUPLICATE_TANK,
    GROUP_ID,
];

pub fn build_group_id(tank: &CellValue) -> CellValue {
    CellValue::Text(format!("TANK::{}", normalize_text(tank)))
}

/// Re-derives `group_id` and `is_duplicate_tank` from the tank column of
/// already merged rows.
pub fn refresh_group_columns(table: &mut Table, tank_col: usize, duplicates: &DuplicateSet) {
    let tanks = table.column_values(tank_col).cloned().collect::<Vec<_>>();
    let group_ids = tanks.iter().map(build_group_id).collect();
    let flags = tanks
        .iter()
        .map(|tank| CellValue::Bool(duplicates.contains(&normalize_text(tank))))
        .collect();
    table.set_column(GROUP_ID, group_ids);
    table.set_column(IS_DUPLICATE_TANK, flags);
}

pub fn merge_lookups(table: &mut Table, tank_col: usize, lookups: &TankLookups) {
    let tanks = table
        .column_values(tank_col)
        .map(normalize_text)
        .collect::<Vec<_>>();
    let sale_prices = tanks.iter().map(|t| lookups.sent_price(t)).collect();
    let com_fns = tanks.iter().map(|t| lookups.broker_com_fn(t)).collect();
    table.set_column(SALE_PRICE_LOOKUP, sale_prices);
    table.set_column(COM_FN_LOOKUP, com_fns);
}

/// Everything outside [`TAIL_COLUMNS`] keeps its order, followed by the tail
/// columns that are present.
pub fn order_columns(table: &Table) -> Table {
    let front = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| !TAIL_COLUMNS.contains(&name.as_str()))
        .map(|(idx, _)| idx);
    let tail = TAIL_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name));
    let order = front.chain(tail).collect::<Vec<_>>();
    table.reorder(&order)
}

use itertools::Itertools;

use crate::{
    data::Table,
    schema::{ColumnMapping, TransformOptions},
};

/// Column positions for every mapped role, resolved once against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub tank_no: usize,
    pub item: usize,
    pub sale_price: usize,
    pub total_value: usize,
    pub product_value: usize,
    pub tax: usize,
    pub com_fn: usize,
    pub com: usize,
}

pub fn validate_required_columns(table: &Table, options: &TransformOptions) -> Vec<String> {
    let missing = options
        .mapping
        .required_columns()
        .into_iter()
        .filter(|name| !table.has_column(name))
        .collect::<Vec<_>>();
    if missing.is_empty() {
        Vec::new()
    } else {
        vec![format!("Missing required columns: {}", missing.iter().join(", "))]
    }
}

pub fn resolve_columns(table: &Table, mapping: &ColumnMapping) -> Option<ResolvedColumns> {
    Some(ResolvedColumns {
        tank_no: table.column_index(&mapping.tank_no)?,
        item: table.column_index(&mapping.item)?,
        sale_price: table.column_index(&mapping.sale_price)?,
        total_value: table.column_index(&mapping.total_value)?,
        product_value: table.column_index(&mapping.product_value)?,
        tax: table.column_index(&mapping.tax)?,
        com_fn: table.column_index(&mapping.com_fn)?,
        com: table.column_index(&mapping.com)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn reports_missing_columns_in_role_order() {
        let table = table_with(&["เลขถัง", "รายการ", "ราคาขายเดิม", "มูลค่ารวม", "COM F/N"]);
        let issues = validate_required_columns(&table, &TransformOptions::default());
        assert_eq!(
            issues,
            vec!["Missing required columns: มูลค่าสินค้า, ภาษี, COM".to_string()]
        );
        assert!(resolve_columns(&table, &TransformOptions::default().mapping).is_none());
    }

    #[test]
    fn complete_tables_resolve_every_role() {
        let table = table_with(&[
            "COM",
            "เลขถัง",
            "รายการ",
            "ราคาขายเดิม",
            "มูลค่ารวม",
            "มูลค่าสินค้า",
            "ภาษี",
            "COM F/N",
        ]);
        let options = TransformOptions::default();
        assert!(validate_required_columns(&table, &options).is_empty());
        let resolved = resolve_columns(&table, &options.mapping).unwrap();
        assert_eq!(resolved.com, 0);
        assert_eq!(resolved.tank_no, 1);
        assert_eq!(resolved.com_fn, 7);
    }
}

//! Finance screening rules engine.
//!
//! [`apply_business_rules()`] is a pure function of an input [`Table`] and
//! [`TransformOptions`]. It never mutates the caller's table. Missing mapped
//! columns short-circuit with an issue list and the untouched input. Otherwise
//! the pipeline runs in this order:
//!
//! 1. append the derived `rule_applied` / `is_duplicate_tank` / `group_id` columns
//! 2. flag duplicate tank numbers and stamp `group_id`
//! 3. rewrite cells for finance-sent and finance-broker rows
//! 4. collect per-tank lookups from the rewritten rows
//! 5. optionally merge rows per tank (`DuplicateMode::Group`)
//! 6. write the lookups into `ราคาขาย` / `COM F/N`, drop `com`, order columns

pub mod columns;
pub mod group;
pub mod rules;

use log::{debug, info, warn};

use crate::{
    data::{CellValue, Table, normalize_text},
    schema::{DuplicateMode, TransformOptions, TransformStats},
    validation::{resolve_columns, validate_required_columns},
};

use self::{
    group::{DuplicateSet, group_rows, resolve_policies},
    rules::{TankLookups, apply_row_rules, classify_rows},
};

pub const RULE_APPLIED: &str = "rule_applied";
pub const IS_DUPLICATE_TANK: &str = "is_duplicate_tank";
pub const GROUP_ID: &str = "group_id";
pub const SALE_PRICE_LOOKUP: &str = "ราคาขาย";
pub const COM_FN_LOOKUP: &str = "COM F/N";

pub const FINANCE_SENT: &str = "finance_sent";
pub const FINANCE_BROKER: &str = "finance_broker";

#[derive(Debug, Clone, PartialEq)]
pub struct RuleEngineResult {
    pub table: Table,
    pub stats: TransformStats,
    pub issues: Vec<String>,
}

impl RuleEngineResult {
    pub fn is_success(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn apply_business_rules(input: &Table, options: &TransformOptions) -> RuleEngineResult {
    let issues = validate_required_columns(input, options);
    let mapped = match resolve_columns(input, &options.mapping) {
        Some(mapped) if issues.is_empty() => mapped,
        _ => {
            for issue in &issues {
                warn!("{issue}");
            }
            // rows_out stays 0 here even though the input is handed back unchanged.
            return RuleEngineResult {
                table: input.clone(),
                stats: TransformStats {
                    rows_in: input.len(),
                    ..TransformStats::default()
                },
                issues,
            };
        }
    };

    let mut working = input.clone();
    let rule_col = working.ensure_column(RULE_APPLIED);
    let dup_col = working.ensure_column(IS_DUPLICATE_TANK);
    working.ensure_column(GROUP_ID);

    let tank_norm = working
        .column_values(mapped.tank_no)
        .map(normalize_text)
        .collect::<Vec<_>>();
    let duplicates = DuplicateSet::detect(&tank_norm);
    debug!(
        "{} duplicate tank group(s) covering {} row(s)",
        duplicates.group_count(),
        duplicates.row_count()
    );
    let group_ids = working
        .column_values(mapped.tank_no)
        .map(columns::build_group_id)
        .collect();
    working.set_column(GROUP_ID, group_ids);
    working.set_column(
        IS_DUPLICATE_TANK,
        duplicates.mask().iter().map(|&flag| CellValue::Bool(flag)).collect(),
    );

    let classes = classify_rows(&working, &mapped, options);
    let working = apply_row_rules(working, &mapped, rule_col, &classes);
    let lookups = TankLookups::build(&working, &mapped, &tank_norm, &classes);
    debug!(
        "Lookups built for {} finance-sent tank(s) and {} finance-broker tank(s)",
        lookups.sent_price_by_tank.len(),
        lookups.broker_comfn_by_tank.len()
    );

    let rows_in = working.len();
    let mut output = match options.duplicate_mode {
        DuplicateMode::Keep => working,
        DuplicateMode::Group => {
            let policies = resolve_policies(&working, &[dup_col], &[rule_col, mapped.tank_no]);
            let mut grouped = group_rows(&working, &tank_norm, &policies);
            columns::refresh_group_columns(&mut grouped, mapped.tank_no, &duplicates);
            debug!("Grouped {} row(s) into {}", rows_in, grouped.len());
            grouped
        }
    };

    columns::merge_lookups(&mut output, mapped.tank_no, &lookups);
    output.drop_column(&options.mapping.com);
    let output = columns::order_columns(&output);

    let stats = TransformStats {
        rows_in,
        rows_out: output.len(),
        finance_sent_count: classes.iter().filter(|c| c.finance_sent).count(),
        finance_broker_count: classes.iter().filter(|c| c.finance_broker).count(),
        duplicate_tank_groups: duplicates.group_count(),
        duplicate_rows: duplicates.row_count(),
    };
    info!(
        "Applied rules to {} row(s) -> {} row(s) ({} finance-sent, {} finance-broker)",
        stats.rows_in, stats.rows_out, stats.finance_sent_count, stats.finance_broker_count
    );

    RuleEngineResult {
        table: output,
        stats,
        issues: Vec::new(),
    }
}

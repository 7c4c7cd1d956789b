use anyhow::{Result, bail};
use log::{info, warn};

use crate::{cli::TransformArgs, engine::apply_business_rules, io_utils};

pub fn execute(args: &TransformArgs) -> Result<()> {
    let options = args.options.resolve()?;
    info!(
        "Transforming '{}' -> '{}' (duplicate mode {:?})",
        args.input.display(),
        args.output.display(),
        options.duplicate_mode
    );
    let input = io_utils::read_table_from_path(&args.input)?;
    let result = apply_business_rules(&input, &options);
    if !result.is_success() {
        for issue in &result.issues {
            warn!("{issue}");
        }
        bail!(
            "No workbook written; {} issue(s): {}",
            result.issues.len(),
            result.issues.join("; ")
        );
    }

    io_utils::write_table_to_path(&result.table, &args.output)?;
    info!(
        "Wrote {} row(s) to {:?} ({} duplicate tank group(s))",
        result.stats.rows_out, args.output, result.stats.duplicate_tank_groups
    );
    Ok(())
}

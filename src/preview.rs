use anyhow::{Context, Result};
use log::{info, warn};

use crate::{api, cli::PreviewArgs, engine::apply_business_rules, io_utils, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let options = args.options.resolve()?;
    let input = io_utils::read_table_from_path(&args.input)?;
    let result = apply_business_rules(&input, &options);
    for issue in &result.issues {
        warn!("{issue}");
    }

    if args.table {
        table::print_table(&result.table.head(args.rows));
        let stats = &result.stats;
        info!(
            "rows in {} / out {}, finance-sent {}, finance-broker {}, duplicate tanks {} across {} row(s)",
            stats.rows_in,
            stats.rows_out,
            stats.finance_sent_count,
            stats.finance_broker_count,
            stats.duplicate_tank_groups,
            stats.duplicate_rows
        );
        return Ok(());
    }

    let response = api::preview_response(result, args.rows)?;
    let rendered =
        serde_json::to_string_pretty(&response).context("Serializing preview response")?;
    println!("{rendered}");
    info!(
        "Previewed {} row(s) from {:?}",
        response.rows.len(),
        args.input
    );
    Ok(())
}

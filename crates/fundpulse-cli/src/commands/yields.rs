//! Yields command implementation.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use fundpulse_core::YieldPeriod;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::{format_percent, print_header, print_output};

#[derive(Debug, Serialize, Tabled)]
struct YieldRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Yield")]
    value: String,
}

/// Execute the yields command.
///
/// Periods the provider did not report show as `-`.
pub async fn execute(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let snapshot = ctx.current_fund().await?;

    let rows: Vec<YieldRow> = YieldPeriod::all()
        .iter()
        .map(|period| YieldRow {
            period: period.label().to_string(),
            value: snapshot
                .yield_for(*period)
                .map(format_percent)
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!("Yields of {} ({})", snapshot.name(), snapshot.code()));
    }
    print_output(&rows, format)
}

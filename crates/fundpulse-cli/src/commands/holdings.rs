//! Holdings command implementation.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::{print_header, print_output};

/// Holding row for display.
#[derive(Debug, Serialize, Tabled)]
struct HoldingRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Weight (%)")]
    weight: String,
}

/// Execute the holdings command.
pub async fn execute(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let snapshot = ctx.current_fund().await?;

    let rows: Vec<HoldingRow> = snapshot
        .holdings()
        .iter()
        .map(|h| HoldingRow {
            code: h.code.clone(),
            name: h.name.clone(),
            weight: h.weight.to_string(),
        })
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!("Holdings of {} ({})", snapshot.name(), snapshot.code()));
    }
    print_output(&rows, format)
}

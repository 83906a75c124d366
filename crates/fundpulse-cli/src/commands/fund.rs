//! Fund command implementation.
//!
//! Selects the current fund. Every other data command works on it.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use fundpulse_core::FundSnapshot;
use fundpulse_ext_http::EastmoneyFundSource;
use fundpulse_traits::FundSource;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::{format_percent, print_header, print_output, print_success, KeyValue};

/// Arguments for the fund command.
#[derive(Args, Debug)]
pub struct FundArgs {
    #[command(subcommand)]
    pub command: FundCommand,
}

/// Fund subcommands.
#[derive(Subcommand, Debug)]
pub enum FundCommand {
    /// Fetch a fund and make it the current fund
    Set(SetArgs),

    /// Show the current fund
    Show,

    /// Forget the current fund
    Clear,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Fund code (e.g. 161725)
    pub code: String,
}

/// Execute the fund command.
pub async fn execute(args: FundArgs, ctx: &AppContext, format: OutputFormat) -> Result<()> {
    match args.command {
        FundCommand::Set(set_args) => execute_set(set_args, ctx).await,
        FundCommand::Show => execute_show(ctx, format).await,
        FundCommand::Clear => execute_clear(ctx).await,
    }
}

async fn execute_set(args: SetArgs, ctx: &AppContext) -> Result<()> {
    let code = args.code.trim();
    let source = EastmoneyFundSource::new(&ctx.config.http_config())?;
    let snapshot = source.load_snapshot(code).await?;

    ctx.snapshots.save(&snapshot).await?;
    info!(
        fund = snapshot.code(),
        source = source.source_name(),
        holdings = snapshot.holdings().len(),
        "Current fund replaced"
    );

    print_success(&format!(
        "Selected {} ({}) with {} holdings",
        snapshot.name(),
        snapshot.code(),
        snapshot.holdings().len()
    ));
    Ok(())
}

async fn execute_show(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let snapshot = ctx.current_fund().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Minimal => {
            println!("{} {}", snapshot.code(), snapshot.name());
        }
        OutputFormat::Table | OutputFormat::Csv => {
            if format == OutputFormat::Table {
                print_header("Current Fund");
            }
            print_output(&summary(&snapshot), format)?;
        }
    }
    Ok(())
}

async fn execute_clear(ctx: &AppContext) -> Result<()> {
    ctx.snapshots.clear().await?;
    print_success("Current fund cleared");
    Ok(())
}

fn summary(snapshot: &FundSnapshot) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("Code", snapshot.code()),
        KeyValue::new("Name", snapshot.name()),
        KeyValue::new("Holdings", snapshot.holdings().len().to_string()),
        KeyValue::new("Total weight", format!("{}%", snapshot.total_weight())),
    ];
    for (period, value) in snapshot.yields() {
        rows.push(KeyValue::new(
            format!("Yield ({})", period),
            format_percent(*value),
        ));
    }
    rows
}

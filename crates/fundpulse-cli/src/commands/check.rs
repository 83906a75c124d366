//! Check command implementation.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use fundpulse_ext_http::{
    CheckResult, ConnectivityChecker, GoogleLanguageClient, GOOGLE_LANGUAGE_URL,
};
use fundpulse_traits::SentimentClient;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::{print_header, print_output, print_success, print_warning};

/// Fund checked when no fund is selected.
const FALLBACK_FUND: &str = "161725";

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Fund code for the fund data checks (defaults to the current fund)
    #[arg(long)]
    pub fund: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct CheckRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Time (ms)")]
    elapsed_ms: u64,
    #[tabled(rename = "Detail")]
    detail: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&CheckResult> for CheckRow {
    fn from(check: &CheckResult) -> Self {
        Self {
            name: check.name.clone(),
            result: if check.reachable { "ok" } else { "failed" }.to_string(),
            status: check
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            elapsed_ms: check.elapsed_ms,
            detail: check.error.clone().unwrap_or_default(),
            url: check.url.clone(),
        }
    }
}

/// Execute the check command.
pub async fn execute(args: CheckArgs, ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let config = &ctx.config;
    let http = config.http_config();
    let fund_code = match args.fund {
        Some(code) => code,
        None => ctx
            .snapshots
            .load()
            .await?
            .map(|s| s.code().to_string())
            .unwrap_or_else(|| FALLBACK_FUND.to_string()),
    };

    // A missing key is reported as a failed row, not a command error.
    let sentiment =
        GoogleLanguageClient::from_env(&config.api_key_env, config.language.code(), &http)
            .map(|client| Arc::new(client) as Arc<dyn SentimentClient>);
    let checker =
        ConnectivityChecker::new(&http, ConnectivityChecker::default_targets(&fund_code))?
            .with_sentiment(GOOGLE_LANGUAGE_URL, sentiment);
    let results = checker.run().await;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let rows: Vec<CheckRow> = results.iter().map(CheckRow::from).collect();
    if format != OutputFormat::Table {
        return print_output(&rows, format);
    }

    print_header("Connectivity");
    print_output(&rows, format)?;

    let failed = results.iter().filter(|r| !r.reachable).count();
    if failed == 0 {
        print_success("All services reachable");
    } else {
        print_warning(&format!("{} of {} services failed", failed, results.len()));
    }
    Ok(())
}

//! Predict command implementation.
//!
//! Runs the holdings predictor against live search, extraction and sentiment
//! services for the current fund.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use fundpulse_core::{
    AnalysisStatistics, FailedLink, FundPrediction, FundSnapshot, HoldingAnalysis,
};
use fundpulse_engine::{HoldingsPredictor, PhaseObserver, PredictorPhase};
use fundpulse_ext_http::{GoogleLanguageClient, GoogleNewsSearch};
use fundpulse_extract::ArticleExtractor;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::{
    format_score, print_header, print_output, print_progress, print_warning, KeyValue,
};

/// Target that predicts the whole fund.
pub const ALL: &str = "all";

/// Arguments for the predict command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// `all`, or a holding code or name (a holding named `all` takes precedence)
    #[arg(default_value = ALL)]
    pub target: String,

    /// Search results per holding (overrides the config)
    #[arg(short = 'n', long)]
    pub results: Option<usize>,
}

/// Contribution row for display.
#[derive(Debug, Serialize, Tabled)]
struct ContributionRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Weight (%)")]
    weight: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Weighted")]
    weighted: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Debug, Serialize, Tabled)]
struct FailedLinkRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&FailedLink> for FailedLinkRow {
    fn from(link: &FailedLink) -> Self {
        Self {
            url: link.url.clone(),
            reason: link.reason.clone(),
        }
    }
}

/// Execute the predict command.
pub async fn execute(
    args: PredictArgs,
    ctx: &AppContext,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let snapshot = ctx.current_fund().await?;
    let whole_fund = predicts_whole_fund(&args.target, &snapshot);
    let config = &ctx.config;
    let http = config.http_config();

    // Fail on a missing key before any searching.
    let sentiment =
        GoogleLanguageClient::from_env(&config.api_key_env, config.language.code(), &http)?;
    let search = GoogleNewsSearch::new(&http)?;
    let extractor = ArticleExtractor::new(&config.extractor_config())?;

    let mut predictor_config = config.predictor_config();
    if let Some(results) = args.results {
        predictor_config = predictor_config.with_results_per_holding(results);
    }

    let mut builder = HoldingsPredictor::builder()
        .with_config(predictor_config)
        .with_search(Arc::new(search))
        .with_extractor(Arc::new(extractor))
        .with_sentiment(Arc::new(sentiment))
        .with_cache(ctx.articles.clone())
        .with_snapshot(snapshot);
    if !quiet && format == OutputFormat::Table {
        builder = builder.with_observer(progress_observer());
    }
    let mut predictor = builder.build()?;

    if whole_fund {
        let prediction = predictor.predict_all().await?;
        print_fund(&predictor, &prediction, format)
    } else {
        let analysis = predictor.predict_one(args.target.trim()).await?;
        print_holding(&analysis, predictor.statistics(), format)
    }
}

/// True if `target` asks for the whole fund rather than one holding.
fn predicts_whole_fund(target: &str, snapshot: &FundSnapshot) -> bool {
    target.trim().eq_ignore_ascii_case(ALL) && snapshot.find_holding(target).is_none()
}

fn progress_observer() -> PhaseObserver {
    Arc::new(|phase: &PredictorPhase| {
        if !matches!(phase, PredictorPhase::Idle) {
            print_progress(&phase.to_string());
        }
    })
}

fn print_fund(
    predictor: &HoldingsPredictor,
    prediction: &FundPrediction,
    format: OutputFormat,
) -> Result<()> {
    let statistics = predictor.statistics();
    let rows: Vec<ContributionRow> = predictor
        .contributions()
        .iter()
        .map(|c| ContributionRow {
            code: c.code.clone(),
            name: c.name.clone(),
            weight: c.position_weight.to_string(),
            score: format_score(c.sentiment_score),
            weighted: format_score(c.weighted_score),
            status: c.status.to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "prediction": prediction,
                "contributions": predictor.contributions(),
                "statistics": statistics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => print_output(&rows, format)?,
        OutputFormat::Minimal => println!("{}", prediction.value),
        OutputFormat::Table => {
            print_header(&format!(
                "Contributions for {} ({})",
                prediction.fund_name, prediction.fund_code
            ));
            print_output(&rows, format)?;

            print_header("Prediction");
            let summary = vec![
                KeyValue::new("Prediction", format_score(prediction.value)),
                KeyValue::new("Trend", prediction.trend()),
                KeyValue::new(
                    "Scored",
                    format!("{} of {}", prediction.scored, prediction.attempted),
                ),
                KeyValue::new("Degraded", prediction.degraded.to_string()),
                KeyValue::new(
                    "As of",
                    prediction.predicted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                ),
                KeyValue::new("Links crawled", statistics.crawled_links.to_string()),
                KeyValue::new("Links failed", statistics.failed_links.len().to_string()),
            ];
            print_output(&summary, format)?;
            print_failed_links(statistics, format)?;

            if !prediction.is_complete() {
                print_warning("Some holdings were degraded to a zero score; see Status.");
            }
        }
    }
    Ok(())
}

fn print_holding(
    analysis: &HoldingAnalysis,
    statistics: &AnalysisStatistics,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "analysis": analysis,
                "statistics": statistics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => println!("{}", analysis.score),
        OutputFormat::Table | OutputFormat::Csv => {
            let rows = vec![
                KeyValue::new("Code", analysis.code.as_str()),
                KeyValue::new("Name", analysis.name.as_str()),
                KeyValue::new("Score", format_score(analysis.score)),
                KeyValue::new(
                    "Magnitude",
                    analysis
                        .magnitude
                        .map(|m| format!("{:.4}", m))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                KeyValue::new("Status", analysis.status.to_string()),
                KeyValue::new("Links attempted", analysis.links_attempted.to_string()),
                KeyValue::new("Articles extracted", analysis.articles_extracted.to_string()),
                KeyValue::new("Links failed", statistics.failed_links.len().to_string()),
            ];
            if format == OutputFormat::Table {
                print_header(&format!("Sentiment for {}", analysis.name));
            }
            print_output(&rows, format)?;
            if format == OutputFormat::Table {
                print_failed_links(statistics, format)?;
            }
        }
    }
    Ok(())
}

fn print_failed_links(statistics: &AnalysisStatistics, format: OutputFormat) -> Result<()> {
    if statistics.failed_links.is_empty() {
        return Ok(());
    }
    let rows: Vec<FailedLinkRow> = statistics.failed_links.iter().map(Into::into).collect();
    print_header("Failed Links");
    print_output(&rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundpulse_core::Holding;

    fn fund(names: &[(&str, &str)]) -> FundSnapshot {
        let weight = Holding::parse_weight("1").unwrap();
        FundSnapshot::builder("161725", "Liquor Index Fund")
            .holdings(
                names
                    .iter()
                    .map(|(code, name)| Holding::new(*code, *name, weight).unwrap()),
            )
            .build()
    }

    #[test]
    fn test_all_predicts_whole_fund() {
        let snapshot = fund(&[("600519", "Kweichow Moutai")]);
        assert!(predicts_whole_fund("all", &snapshot));
        assert!(predicts_whole_fund(" ALL ", &snapshot));
        assert!(!predicts_whole_fund("600519", &snapshot));
    }

    #[test]
    fn test_holding_named_all_is_predicted_alone() {
        let snapshot = fund(&[("600519", "Kweichow Moutai"), ("000001", "all")]);
        assert!(!predicts_whole_fund("all", &snapshot));
        assert!(predicts_whole_fund("ALL", &snapshot));
    }
}

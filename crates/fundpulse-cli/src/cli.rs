//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{
    ArticlesArgs, CheckArgs, ConfigArgs, FundArgs, LogsArgs, PredictArgs,
};

/// FundPulse - Holdings-weighted news sentiment for mutual funds
#[derive(Parser)]
#[command(name = "fundpulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (TOML)
    #[arg(short, long, env = "FUNDPULSE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for the cache, current fund and log file
    #[arg(long, env = "FUNDPULSE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Select, show or forget the current fund
    Fund(FundArgs),

    /// List the current fund's holdings
    Holdings,

    /// Show the current fund's trailing yields
    Yields,

    /// Predict sentiment for the whole fund or a single holding
    Predict(PredictArgs),

    /// Inspect or clear cached articles
    Articles(ArticlesArgs),

    /// Inspect or clear the log file
    Logs(LogsArgs),

    /// Check that the data, search and sentiment services are reachable
    Check(CheckArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}

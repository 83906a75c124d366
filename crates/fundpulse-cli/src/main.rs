//! FundPulse CLI
//!
//! Predicts a mutual fund's short-term direction from news sentiment about
//! its holdings.
//!
//! # Usage
//!
//! ```bash
//! # Select a fund
//! fundpulse fund set 161725
//!
//! # Inspect it
//! fundpulse holdings
//! fundpulse yields
//!
//! # Predict the whole fund, or one holding by code or name
//! fundpulse predict
//! fundpulse predict 600519
//!
//! # Inspect cached articles and logs
//! fundpulse articles list
//! fundpulse logs show --tail 50
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;
mod config;
mod context;
mod error;
mod logging;
mod output;

use cli::{Cli, Commands};
use config::AppConfig;
use context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format;
    let quiet = cli.quiet;
    let config_path = cli.config.clone();

    // `config init` may be pointed at a file that does not exist yet.
    let mut config = match (&cli.command, config_path.as_deref()) {
        (Commands::Config(_), Some(path)) if !path.exists() => AppConfig::default(),
        (_, explicit) => AppConfig::load(explicit)?,
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    if !matches!(cli.command, Commands::Config(_) | Commands::Logs(_)) {
        if let Err(e) = logging::init(&config, quiet) {
            output::print_warning(&format!("Logging disabled: {}", e));
        }
    }
    debug!(command = ?std::env::args().skip(1).collect::<Vec<_>>(), "Starting");

    match cli.command {
        Commands::Config(args) => {
            commands::config::execute(args, &config, config_path.as_deref(), format)?
        }
        Commands::Logs(args) => commands::logs::execute(args, &config, format)?,
        command => {
            let ctx = AppContext::open(config)?;
            match command {
                Commands::Fund(args) => commands::fund::execute(args, &ctx, format).await?,
                Commands::Holdings => commands::holdings::execute(&ctx, format).await?,
                Commands::Yields => commands::yields::execute(&ctx, format).await?,
                Commands::Predict(args) => {
                    commands::predict::execute(args, &ctx, format, quiet).await?
                }
                Commands::Articles(args) => commands::articles::execute(args, &ctx, format).await?,
                Commands::Check(args) => commands::check::execute(args, &ctx, format).await?,
                Commands::Config(_) | Commands::Logs(_) => {}
            }
        }
    }

    Ok(())
}

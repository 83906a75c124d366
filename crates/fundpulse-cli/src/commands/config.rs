//! Config command implementation.
//!
//! Shows the effective configuration and writes a starter file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::config::{default_config_path, AppConfig};
use crate::output::{print_header, print_output, print_success, print_warning, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file location
    Path,

    /// Write the default configuration to the configuration file
    Init(InitArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
///
/// `explicit` is the `--config` path, if one was given.
pub fn execute(
    args: ConfigArgs,
    config: &AppConfig,
    explicit: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(config, format),
        ConfigCommand::Path => execute_path(explicit),
        ConfigCommand::Init(init_args) => execute_init(init_args, explicit),
    }
}

/// Show current configuration.
fn execute_show(config: &AppConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Minimal => {
            print!("{}", config.to_toml()?);
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let results = vec![
                KeyValue::new("data_dir", config.data_dir.display().to_string()),
                KeyValue::new("cache_backend", config.cache_backend.to_string()),
                KeyValue::new("log_file", config.log_path().display().to_string()),
                KeyValue::new("console_output", config.console_output.to_string()),
                KeyValue::new("fetch_timeout_secs", config.fetch_timeout_secs.to_string()),
                KeyValue::new(
                    "request_timeout_secs",
                    config.request_timeout_secs.to_string(),
                ),
                KeyValue::new(
                    "results_per_holding",
                    config.results_per_holding.to_string(),
                ),
                KeyValue::new("date_window", config.date_window.to_string()),
                KeyValue::new("language", config.language.code()),
                KeyValue::new("api_key_env", config.api_key_env.as_str()),
            ];
            if format == OutputFormat::Table {
                print_header("Current Configuration");
            }
            print_output(&results, format)?;
        }
    }
    Ok(())
}

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Show configuration file location.
fn execute_path(explicit: Option<&Path>) -> Result<()> {
    let path = resolve_path(explicit)?;
    println!("{}", path.display());
    Ok(())
}

/// Write the defaults.
fn execute_init(args: InitArgs, explicit: Option<&Path>) -> Result<()> {
    let path = resolve_path(explicit)?;
    if path.exists() && !args.force {
        print_warning(&format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, AppConfig::default().to_toml()?)?;
    print_success(&format!("Wrote {}", path.display()));
    Ok(())
}

//! Logs command implementation.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::output::{print_info, print_success};

/// Arguments for the logs command.
#[derive(Args, Debug)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

/// Logs subcommands.
#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// Print the log file
    Show(ShowArgs),

    /// Truncate the log file
    Clear,

    /// Show the log file location
    Path,
}

/// Arguments for show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only the last N lines
    #[arg(short = 'n', long)]
    pub tail: Option<usize>,
}

/// Execute the logs command.
pub fn execute(args: LogsArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let path = config.log_path();
    match args.command {
        LogsCommand::Show(show_args) => execute_show(show_args, &path, format),
        LogsCommand::Clear => execute_clear(&path),
        LogsCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn execute_show(args: ShowArgs, path: &Path, format: OutputFormat) -> Result<()> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let lines = tail_lines(&content, args.tail);
    if lines.is_empty() && format == OutputFormat::Table {
        print_info("Log file is empty.");
        return Ok(());
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}

fn execute_clear(path: &Path) -> Result<()> {
    if path.exists() {
        OpenOptions::new().write(true).truncate(true).open(path)?;
    }
    print_success(&format!("Cleared {}", path.display()));
    Ok(())
}

/// The last `tail` lines of `content`, or all of them.
fn tail_lines(content: &str, tail: Option<usize>) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    match tail {
        Some(n) if n < lines.len() => lines[lines.len() - n..].to_vec(),
        _ => lines,
    }
}

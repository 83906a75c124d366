//! Articles command implementation.
//!
//! Inspects the article cache filled by `predict`.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use fundpulse_traits::ArticleSummary;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::error::CliError;
use crate::output::{print_header, print_output, print_success};

/// Arguments for the articles command.
#[derive(Args, Debug)]
pub struct ArticlesArgs {
    #[command(subcommand)]
    pub command: ArticlesCommand,
}

/// Articles subcommands.
#[derive(Subcommand, Debug)]
pub enum ArticlesCommand {
    /// List cached articles
    List(ListArgs),

    /// List the subjects (holding names) articles are cached under
    Subjects,

    /// Print a cached article's text
    Show(ShowArgs),

    /// Delete every cached article
    Clear,
}

/// Arguments for list subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only articles cached under this subject
    #[arg(short, long)]
    pub subject: Option<String>,
}

/// Arguments for show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Article URL
    pub url: String,

    /// Subject the article is cached under; any subject when omitted
    #[arg(short, long)]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct ArticleRow {
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<ArticleSummary> for ArticleRow {
    fn from(summary: ArticleSummary) -> Self {
        Self {
            subject: summary.subject,
            title: summary.title,
            url: summary.url,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct SubjectRow {
    #[tabled(rename = "Subject")]
    subject: String,
}

/// Execute the articles command.
pub async fn execute(args: ArticlesArgs, ctx: &AppContext, format: OutputFormat) -> Result<()> {
    match args.command {
        ArticlesCommand::List(list_args) => execute_list(list_args, ctx, format).await,
        ArticlesCommand::Subjects => execute_subjects(ctx, format).await,
        ArticlesCommand::Show(show_args) => execute_show(show_args, ctx, format).await,
        ArticlesCommand::Clear => execute_clear(ctx).await,
    }
}

async fn execute_list(args: ListArgs, ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let rows: Vec<ArticleRow> = ctx
        .articles
        .list_all()
        .await?
        .into_iter()
        .filter(|a| args.subject.as_deref().map_or(true, |s| a.subject == s))
        .map(ArticleRow::from)
        .collect();

    if format == OutputFormat::Table {
        print_header(&format!("Cached Articles ({})", rows.len()));
    }
    print_output(&rows, format)
}

async fn execute_subjects(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let rows: Vec<SubjectRow> = ctx
        .articles
        .list_subjects()
        .await?
        .into_iter()
        .map(|subject| SubjectRow { subject })
        .collect();
    print_output(&rows, format)
}

async fn execute_show(args: ShowArgs, ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let article = match &args.subject {
        Some(subject) => ctx
            .articles
            .get(subject, &args.url)
            .await?
            .map(|content| (subject.clone(), content)),
        None => ctx
            .articles
            .find_by_url(&args.url)
            .await?
            .map(|a| (a.subject, a.content)),
    };
    let (subject, content) = article.ok_or_else(|| CliError::ArticleNotFound(args.url.clone()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "subject": subject,
                "url": args.url,
                "content": content,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            print_header(&format!("{} [{}]", args.url, subject));
            println!("{}", content);
        }
        OutputFormat::Csv | OutputFormat::Minimal => println!("{}", content),
    }
    Ok(())
}

async fn execute_clear(ctx: &AppContext) -> Result<()> {
    ctx.articles.clear().await?;
    print_success(&format!("Cleared the {} article cache", ctx.articles.backend_name()));
    Ok(())
}

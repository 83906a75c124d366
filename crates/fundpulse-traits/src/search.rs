//! News search.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// How far back a news search looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    /// Past hour
    Hour,
    /// Past day
    Day,
    /// Past week
    #[default]
    Week,
    /// Past month
    Month,
    /// Past year
    Year,
}

impl DateWindow {
    /// Single-letter provider code (`h`, `d`, `w`, `m`, `y`).
    pub fn code(&self) -> &'static str {
        match self {
            DateWindow::Hour => "h",
            DateWindow::Day => "d",
            DateWindow::Week => "w",
            DateWindow::Month => "m",
            DateWindow::Year => "y",
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateWindow::Hour => "hour",
            DateWindow::Day => "day",
            DateWindow::Week => "week",
            DateWindow::Month => "month",
            DateWindow::Year => "year",
        };
        f.write_str(s)
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h" | "hour" => Ok(DateWindow::Hour),
            "d" | "day" => Ok(DateWindow::Day),
            "w" | "week" => Ok(DateWindow::Week),
            "m" | "month" => Ok(DateWindow::Month),
            "y" | "year" => Ok(DateWindow::Year),
            other => Err(format!(
                "unknown date window '{}' (expected hour, day, week, month or year)",
                other
            )),
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result headline
    pub title: String,
    /// Article URL
    pub url: String,
}

impl SearchResult {
    /// Create a search result.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Trait for news search providers.
///
/// Implementations return results in provider order and may return fewer than
/// `max_results`. When nothing is found, or the provider appears to be
/// rate-limiting, they return an empty list rather than an error; callers
/// treat an empty list as "no signal".
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search recent news for `query`.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        window: DateWindow,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

//! Application configuration.
//!
//! Loaded from `--config`, else `<config_dir>/fundpulse/config.toml` when it
//! exists, else defaults. The sentiment API key is never stored here; only the
//! name of the environment variable that holds it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fundpulse_engine::PredictorConfig;
use fundpulse_ext_http::HttpConfig;
use fundpulse_extract::{ExtractorConfig, Language};
use fundpulse_traits::DateWindow;

use crate::error::{CliError, CliResult};

/// File name of the redb database inside the data directory.
pub const REDB_FILE: &str = "fundpulse.redb";
/// File name of the JSON article cache inside the data directory.
pub const ARTICLES_FILE: &str = "articles.json";
/// File name of the JSON current-fund store inside the data directory.
pub const FUND_FILE: &str = "fund.json";
/// Default log file name inside the data directory.
pub const LOG_FILE: &str = "fundpulse.log";

/// Where articles and the current fund are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Embedded redb database
    #[default]
    Redb,
    /// Plain JSON files
    Json,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::Redb => f.write_str("redb"),
            CacheBackend::Json => f.write_str("json"),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// Log file, defaults to `<data_dir>/fundpulse.log`
    pub log_file: Option<PathBuf>,

    /// Echo log lines to stderr
    #[serde(default)]
    pub console_output: bool,

    /// Article fetch timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Fund data, search and sentiment request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Search results analysed per holding
    #[serde(default = "default_results")]
    pub results_per_holding: usize,

    /// How far back news searches look
    #[serde(default)]
    pub date_window: DateWindow,

    /// Language of the news and of the sentiment request
    #[serde(default)]
    pub language: Language,

    /// Environment variable holding the sentiment API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("fundpulse"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn default_fetch_timeout() -> u64 {
    3
}

fn default_request_timeout() -> u64 {
    10
}

fn default_results() -> usize {
    10
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_backend: CacheBackend::default(),
            log_file: None,
            console_output: false,
            fetch_timeout_secs: default_fetch_timeout(),
            request_timeout_secs: default_request_timeout(),
            results_per_holding: default_results(),
            date_window: DateWindow::default(),
            language: Language::default(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(CliError::ConfigNotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Effective log file path.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_FILE))
    }

    /// Predictor settings.
    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig::default()
            .with_results_per_holding(self.results_per_holding)
            .with_date_window(self.date_window)
    }

    /// Article fetch settings.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::default()
            .with_timeout(Duration::from_secs(self.fetch_timeout_secs))
            .with_language(self.language)
    }

    /// Adapter client settings.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
            ..HttpConfig::default()
        }
    }
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("fundpulse").join("config.toml"))
}

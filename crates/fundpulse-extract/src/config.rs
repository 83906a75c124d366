//! Extractor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stopwords::Language;

/// Browser-like user agent; many news sites block obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Settings for fetching and extracting articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Per-request fetch timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Language of the stopword list used by the primary strategy
    #[serde(default)]
    pub language: Language,
}

fn default_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            language: Language::default(),
        }
    }
}

impl ExtractorConfig {
    /// Override the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the stopword language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

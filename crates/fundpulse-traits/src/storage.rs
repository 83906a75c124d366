//! Storage traits for persistence.
//!
//! - [`ArticleCache`]: extracted article text, partitioned by subject
//! - [`SnapshotStore`]: the currently selected fund
//!
//! Storage implementations are EXTENSIONS (redb, JSON file, memory).

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fundpulse_core::FundSnapshot;

use crate::error::TraitError;

// =============================================================================
// ARTICLE CACHE
// =============================================================================

/// An extracted article stored under a subject.
///
/// The subject is the search query (the holding name). A URL is unique within
/// its subject only; the same URL under two subjects is two entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedArticle {
    /// Search query the article was found with
    pub subject: String,
    /// Article URL
    pub url: String,
    /// Search result title
    pub title: String,
    /// Extracted text, one paragraph per line
    pub content: String,
}

/// Listing entry for a cached article.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Search query the article was found with
    pub subject: String,
    /// Search result title
    pub title: String,
    /// Article URL
    pub url: String,
}

impl From<&CachedArticle> for ArticleSummary {
    fn from(article: &CachedArticle) -> Self {
        Self {
            subject: article.subject.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
        }
    }
}

/// Article cache keyed by (subject, url).
///
/// Writes to an existing key overwrite it (last writer wins). Entries never
/// expire; [`ArticleCache::clear`] drops everything.
#[async_trait]
pub trait ArticleCache: Send + Sync {
    /// Backend name, for logs.
    fn backend_name(&self) -> &'static str;

    /// Insert or overwrite the article at (subject, url).
    async fn put(
        &self,
        subject: &str,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<(), TraitError>;

    /// Content stored at (subject, url).
    async fn get(&self, subject: &str, url: &str) -> Result<Option<String>, TraitError>;

    /// First article with this URL under any subject.
    async fn find_by_url(&self, url: &str) -> Result<Option<CachedArticle>, TraitError>;

    /// All cached articles, ordered by subject then URL.
    async fn list_all(&self) -> Result<Vec<ArticleSummary>, TraitError>;

    /// Every subject with at least one article.
    async fn list_subjects(&self) -> Result<BTreeSet<String>, TraitError>;

    /// Remove every article.
    async fn clear(&self) -> Result<(), TraitError>;
}

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// Persistence for the currently selected fund.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replace the current fund.
    async fn save(&self, snapshot: &FundSnapshot) -> Result<(), TraitError>;

    /// The current fund, if one was selected.
    async fn load(&self) -> Result<Option<FundSnapshot>, TraitError>;

    /// Forget the current fund.
    async fn clear(&self) -> Result<(), TraitError>;
}

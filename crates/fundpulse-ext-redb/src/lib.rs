//! # FundPulse Ext Redb
//!
//! Embedded storage implementation using redb.
//!
//! This crate provides default storage implementations for:
//! - The article cache ([`RedbArticleCache`])
//! - The currently selected fund ([`RedbSnapshotStore`])
//!
//! Both share one database file; see [`create_redb_storage`].

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use fundpulse_core::FundSnapshot;
use fundpulse_traits::error::TraitError;
use fundpulse_traits::storage::{ArticleCache, ArticleSummary, CachedArticle, SnapshotStore};

// Table definitions
const ARTICLES: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("articles");
const CURRENT_FUND: TableDefinition<&str, &[u8]> = TableDefinition::new("current_fund");

const CURRENT_KEY: &str = "current";

fn db_err(e: impl std::fmt::Display) -> TraitError {
    TraitError::DatabaseError(e.to_string())
}

// =============================================================================
// ARTICLE CACHE
// =============================================================================

/// Redb-based article cache keyed by (subject, url).
pub struct RedbArticleCache {
    db: Arc<Database>,
}

impl RedbArticleCache {
    /// Create a cache over an open database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Open (or create) a database file holding only the cache.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let db = Database::create(path).map_err(db_err)?;
        Ok(Self::new(Arc::new(db)))
    }

    fn scan(&self) -> Result<Vec<CachedArticle>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(ARTICLES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(db_err(e)),
        };

        let mut articles = Vec::new();
        for result in table.iter().map_err(db_err)? {
            let (_, value) = result.map_err(db_err)?;
            let article: CachedArticle = serde_json::from_slice(value.value())
                .map_err(|e| TraitError::ParseError(e.to_string()))?;
            articles.push(article);
        }
        Ok(articles)
    }
}

#[async_trait]
impl ArticleCache for RedbArticleCache {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    async fn put(
        &self,
        subject: &str,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<(), TraitError> {
        let article = CachedArticle {
            subject: subject.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        };
        let bytes = serde_json::to_vec(&article)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = write_txn.open_table(ARTICLES).map_err(db_err)?;
            table
                .insert((subject, url), bytes.as_slice())
                .map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;

        debug!(subject, url, "Cached article");
        Ok(())
    }

    async fn get(&self, subject: &str, url: &str) -> Result<Option<String>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(ARTICLES) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(db_err(e)),
        };

        match table.get((subject, url)) {
            Ok(Some(data)) => {
                let article: CachedArticle = serde_json::from_slice(data.value())
                    .map_err(|e| TraitError::ParseError(e.to_string()))?;
                Ok(Some(article.content))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<CachedArticle>, TraitError> {
        Ok(self.scan()?.into_iter().find(|a| a.url == url))
    }

    async fn list_all(&self) -> Result<Vec<ArticleSummary>, TraitError> {
        // Keys are (subject, url) tuples, so table order is already the listing order.
        Ok(self.scan()?.iter().map(ArticleSummary::from).collect())
    }

    async fn list_subjects(&self) -> Result<BTreeSet<String>, TraitError> {
        Ok(self.scan()?.into_iter().map(|a| a.subject).collect())
    }

    async fn clear(&self) -> Result<(), TraitError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;
        write_txn.delete_table(ARTICLES).map_err(db_err)?;
        write_txn.commit().map_err(db_err)?;
        Ok(())
    }
}

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// Redb-based store for the currently selected fund.
pub struct RedbSnapshotStore {
    db: Arc<Database>,
}

impl RedbSnapshotStore {
    /// Create a store over an open database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnapshotStore for RedbSnapshotStore {
    async fn save(&self, snapshot: &FundSnapshot) -> Result<(), TraitError> {
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;

        let write_txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = write_txn.open_table(CURRENT_FUND).map_err(db_err)?;
            table
                .insert(CURRENT_KEY, bytes.as_slice())
                .map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<FundSnapshot>, TraitError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;

        let table = match read_txn.open_table(CURRENT_FUND) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(db_err(e)),
        };

        match table.get(CURRENT_KEY) {
            Ok(Some(data)) => {
                let snapshot: FundSnapshot = serde_json::from_slice(data.value())
                    .map_err(|e| TraitError::ParseError(e.to_string()))?;
                Ok(Some(snapshot))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn clear(&self) -> Result<(), TraitError> {
        let write_txn = self.db.begin_write().map_err(db_err)?;
        write_txn.delete_table(CURRENT_FUND).map_err(db_err)?;
        write_txn.commit().map_err(db_err)?;
        Ok(())
    }
}

// =============================================================================
// FACTORY
// =============================================================================

/// Both redb stores over one database file.
#[derive(Clone)]
pub struct RedbStorage {
    /// Article cache
    pub articles: Arc<RedbArticleCache>,
    /// Current fund
    pub snapshots: Arc<RedbSnapshotStore>,
}

/// Open (or create) a redb database at `path` and wrap it in both stores.
pub fn create_redb_storage(path: impl AsRef<Path>) -> Result<RedbStorage, TraitError> {
    let db = Arc::new(Database::create(path).map_err(db_err)?);

    Ok(RedbStorage {
        articles: Arc::new(RedbArticleCache::new(db.clone())),
        snapshots: Arc::new(RedbSnapshotStore::new(db)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundpulse_core::Holding;
    use rust_decimal_macros::dec;

    fn storage(dir: &tempfile::TempDir) -> RedbStorage {
        create_redb_storage(dir.path().join("fundpulse.redb")).unwrap()
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage(&dir).articles;

        assert_eq!(cache.get("Moutai", "https://a").await.unwrap(), None);

        cache.put("Moutai", "https://a", "T1", "first").await.unwrap();
        cache.put("Moutai", "https://a", "T1", "second").await.unwrap();

        assert_eq!(
            cache.get("Moutai", "https://a").await.unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(cache.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_url_under_two_subjects() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage(&dir).articles;

        cache.put("Wuliangye", "https://a", "T", "w").await.unwrap();
        cache.put("Moutai", "https://a", "T", "m").await.unwrap();
        cache.put("Moutai", "https://b", "T2", "m2").await.unwrap();

        let listing = cache.list_all().await.unwrap();
        let keys: Vec<(&str, &str)> = listing
            .iter()
            .map(|a| (a.subject.as_str(), a.url.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Moutai", "https://a"),
                ("Moutai", "https://b"),
                ("Wuliangye", "https://a")
            ]
        );

        let found = cache.find_by_url("https://a").await.unwrap().unwrap();
        assert_eq!(found.subject, "Moutai");
        assert_eq!(cache.list_subjects().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = storage(&dir).articles;

        cache.clear().await.unwrap();
        cache.put("Moutai", "https://a", "T", "m").await.unwrap();
        cache.clear().await.unwrap();

        assert!(cache.list_all().await.unwrap().is_empty());
        assert!(cache.find_by_url("https://a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.redb");
        {
            let cache = RedbArticleCache::open(&path).unwrap();
            cache.put("Moutai", "https://a", "T", "kept").await.unwrap();
        }
        let cache = RedbArticleCache::open(&path).unwrap();
        assert_eq!(
            cache.get("Moutai", "https://a").await.unwrap().as_deref(),
            Some("kept")
        );
    }

    #[tokio::test]
    async fn test_snapshot_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = storage(&dir).snapshots;

        assert!(store.load().await.unwrap().is_none());

        let snapshot = FundSnapshot::builder("161725", "Liquor Index Fund")
            .holding(Holding::new("600519", "Kweichow Moutai", dec!(15.1)).unwrap())
            .build();
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}

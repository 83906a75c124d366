//! JSON-file and in-memory article caches.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use fundpulse_traits::error::TraitError;
use fundpulse_traits::storage::{ArticleCache, ArticleSummary, CachedArticle};

// =============================================================================
// JSON FILE CACHE
// =============================================================================

/// One article as stored in the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ArticleEntry {
    title: String,
    content: String,
}

type ArticleDocument = BTreeMap<String, BTreeMap<String, ArticleEntry>>;

/// Article cache persisted as a single JSON document.
///
/// The whole document is held in memory and rewritten on every change.
pub struct JsonArticleCache {
    file_path: PathBuf,
    document: Mutex<ArticleDocument>,
}

impl JsonArticleCache {
    /// Open the cache at `file_path`. A missing or empty file is an empty cache.
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let file_path = file_path.as_ref().to_path_buf();
        let document = read_document(&file_path)?;
        Ok(Self {
            file_path,
            document: Mutex::new(document),
        })
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn persist(&self, document: &ArticleDocument) -> Result<(), TraitError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;
        tokio::fs::write(&self.file_path, bytes).await?;
        Ok(())
    }
}

fn read_document(path: &Path) -> Result<ArticleDocument, TraitError> {
    if !path.exists() {
        return Ok(ArticleDocument::new());
    }
    let bytes = std::fs::read(path)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ArticleDocument::new());
    }
    serde_json::from_slice(&bytes).map_err(|e| TraitError::ParseError(e.to_string()))
}

#[async_trait]
impl ArticleCache for JsonArticleCache {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    async fn put(
        &self,
        subject: &str,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<(), TraitError> {
        let mut document = self.document.lock().await;
        let mut next = document.clone();
        next.entry(subject.to_string()).or_default().insert(
            url.to_string(),
            ArticleEntry {
                title: title.to_string(),
                content: content.to_string(),
            },
        );
        self.persist(&next).await?;
        *document = next;
        debug!(subject, url, file = %self.file_path.display(), "Cached article");
        Ok(())
    }

    async fn get(&self, subject: &str, url: &str) -> Result<Option<String>, TraitError> {
        let document = self.document.lock().await;
        Ok(document
            .get(subject)
            .and_then(|articles| articles.get(url))
            .map(|entry| entry.content.clone()))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<CachedArticle>, TraitError> {
        let document = self.document.lock().await;
        Ok(document.iter().find_map(|(subject, articles)| {
            articles.get(url).map(|entry| CachedArticle {
                subject: subject.clone(),
                url: url.to_string(),
                title: entry.title.clone(),
                content: entry.content.clone(),
            })
        }))
    }

    async fn list_all(&self) -> Result<Vec<ArticleSummary>, TraitError> {
        let document = self.document.lock().await;
        Ok(document
            .iter()
            .flat_map(|(subject, articles)| {
                articles.iter().map(move |(url, entry)| ArticleSummary {
                    subject: subject.clone(),
                    title: entry.title.clone(),
                    url: url.clone(),
                })
            })
            .collect())
    }

    async fn list_subjects(&self) -> Result<BTreeSet<String>, TraitError> {
        let document = self.document.lock().await;
        Ok(document
            .iter()
            .filter(|(_, articles)| !articles.is_empty())
            .map(|(subject, _)| subject.clone())
            .collect())
    }

    async fn clear(&self) -> Result<(), TraitError> {
        let mut document = self.document.lock().await;
        self.persist(&ArticleDocument::new()).await?;
        document.clear();
        Ok(())
    }
}

// =============================================================================
// MEMORY CACHE
// =============================================================================

/// In-memory article cache.
#[derive(Default)]
pub struct MemoryArticleCache {
    articles: DashMap<(String, String), CachedArticle>,
}

impl MemoryArticleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached articles.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    fn sorted(&self) -> Vec<CachedArticle> {
        let mut all: Vec<CachedArticle> = self.articles.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| (&a.subject, &a.url).cmp(&(&b.subject, &b.url)));
        all
    }
}

#[async_trait]
impl ArticleCache for MemoryArticleCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(
        &self,
        subject: &str,
        url: &str,
        title: &str,
        content: &str,
    ) -> Result<(), TraitError> {
        self.articles.insert(
            (subject.to_string(), url.to_string()),
            CachedArticle {
                subject: subject.to_string(),
                url: url.to_string(),
                title: title.to_string(),
                content: content.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, subject: &str, url: &str) -> Result<Option<String>, TraitError> {
        Ok(self
            .articles
            .get(&(subject.to_string(), url.to_string()))
            .map(|a| a.content.clone()))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<CachedArticle>, TraitError> {
        Ok(self.sorted().into_iter().find(|a| a.url == url))
    }

    async fn list_all(&self) -> Result<Vec<ArticleSummary>, TraitError> {
        Ok(self.sorted().iter().map(ArticleSummary::from).collect())
    }

    async fn list_subjects(&self) -> Result<BTreeSet<String>, TraitError> {
        Ok(self.articles.iter().map(|e| e.key().0.clone()).collect())
    }

    async fn clear(&self) -> Result<(), TraitError> {
        self.articles.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_cache_writes_nested_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        let cache = JsonArticleCache::open(&path).unwrap();

        cache
            .put("Kweichow Moutai", "https://a", "Moutai up", "Moutai up\nbody")
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["Kweichow Moutai"]["https://a"]["title"], "Moutai up");
        assert_eq!(raw["Kweichow Moutai"]["https://a"]["content"], "Moutai up\nbody");
    }

    #[tokio::test]
    async fn test_json_cache_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        let cache = JsonArticleCache::open(&path).unwrap();
        cache.put("Moutai", "https://a", "T", "kept").await.unwrap();

        // A directory in place of the file makes every write fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(cache.put("Moutai", "https://b", "T", "lost").await.is_err());
        assert_eq!(cache.get("Moutai", "https://b").await.unwrap(), None);

        assert!(cache.clear().await.is_err());
        assert_eq!(
            cache.get("Moutai", "https://a").await.unwrap().as_deref(),
            Some("kept")
        );
        assert_eq!(cache.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_cache_reloads_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("articles.json");
        {
            let cache = JsonArticleCache::open(&path).unwrap();
            cache.put("Moutai", "https://a", "T", "first").await.unwrap();
        }

        let cache = JsonArticleCache::open(&path).unwrap();
        assert_eq!(
            cache.get("Moutai", "https://a").await.unwrap().as_deref(),
            Some("first")
        );

        cache.put("Moutai", "https://a", "T", "second").await.unwrap();
        assert_eq!(
            cache.get("Moutai", "https://a").await.unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(cache.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_cache_empty_file_is_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, "  \n").unwrap();

        let cache = JsonArticleCache::open(&path).unwrap();
        assert!(cache.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_cache_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            JsonArticleCache::open(&path),
            Err(TraitError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_json_cache_find_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonArticleCache::open(dir.path().join("articles.json")).unwrap();

        cache.put("Wuliangye", "https://b", "W", "w").await.unwrap();
        cache.put("Moutai", "https://b", "M", "m").await.unwrap();

        let found = cache.find_by_url("https://b").await.unwrap().unwrap();
        assert_eq!(found.subject, "Moutai");
        assert_eq!(found.title, "M");

        let subjects: Vec<String> = cache.list_subjects().await.unwrap().into_iter().collect();
        assert_eq!(subjects, vec!["Moutai".to_string(), "Wuliangye".to_string()]);

        cache.clear().await.unwrap();
        assert!(cache.list_all().await.unwrap().is_empty());
        assert!(cache.list_subjects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_cache_lists_in_key_order() {
        let cache = MemoryArticleCache::new();
        cache.put("B", "https://2", "t", "c").await.unwrap();
        cache.put("A", "https://9", "t", "c").await.unwrap();
        cache.put("A", "https://1", "t", "c").await.unwrap();

        let urls: Vec<String> = cache
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| format!("{}{}", a.subject, a.url))
            .collect();
        assert_eq!(urls, vec!["Ahttps://1", "Ahttps://9", "Bhttps://2"]);

        cache.clear().await.unwrap();
        assert!(cache.is_empty());
    }
}

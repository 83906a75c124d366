//! Storage opened for one invocation.

use std::sync::Arc;

use tracing::debug;

use fundpulse_core::FundSnapshot;
use fundpulse_ext_file::{JsonArticleCache, JsonSnapshotStore};
use fundpulse_ext_redb::create_redb_storage;
use fundpulse_traits::{ArticleCache, SnapshotStore};

use crate::config::{AppConfig, CacheBackend, ARTICLES_FILE, FUND_FILE, REDB_FILE};
use crate::error::{CliError, CliResult};

/// Configuration plus the stores it selects.
pub struct AppContext {
    /// Effective configuration
    pub config: AppConfig,
    /// Article cache
    pub articles: Arc<dyn ArticleCache>,
    /// Current fund store
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl AppContext {
    /// Open the configured backend under the data directory.
    pub fn open(config: AppConfig) -> CliResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let (articles, snapshots): (Arc<dyn ArticleCache>, Arc<dyn SnapshotStore>) =
            match config.cache_backend {
                CacheBackend::Redb => {
                    let storage = create_redb_storage(config.data_dir.join(REDB_FILE))?;
                    (storage.articles, storage.snapshots)
                }
                CacheBackend::Json => (
                    Arc::new(JsonArticleCache::open(config.data_dir.join(ARTICLES_FILE))?),
                    Arc::new(JsonSnapshotStore::new(config.data_dir.join(FUND_FILE))),
                ),
            };

        debug!(
            backend = %config.cache_backend,
            data_dir = %config.data_dir.display(),
            "Opened storage"
        );

        Ok(Self {
            config,
            articles,
            snapshots,
        })
    }

    /// The current fund, or [`CliError::NoFundSelected`].
    pub async fn current_fund(&self) -> CliResult<FundSnapshot> {
        self.snapshots
            .load()
            .await?
            .ok_or(CliError::NoFundSelected)
    }
}

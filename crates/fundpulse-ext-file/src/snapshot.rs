//! Current-fund persistence as a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use fundpulse_core::FundSnapshot;
use fundpulse_traits::error::TraitError;
use fundpulse_traits::storage::SnapshotStore;

/// Stores the selected fund in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    file_path: PathBuf,
}

impl JsonSnapshotStore {
    /// Store backed by `file_path`. The file is created on first save.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn save(&self, snapshot: &FundSnapshot) -> Result<(), TraitError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| TraitError::SerializationError(e.to_string()))?;
        tokio::fs::write(&self.file_path, bytes).await?;

        debug!(fund = snapshot.code(), file = %self.file_path.display(), "Saved current fund");
        Ok(())
    }

    async fn load(&self) -> Result<Option<FundSnapshot>, TraitError> {
        let bytes = match tokio::fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| TraitError::ParseError(e.to_string()))?;
        Ok(Some(snapshot))
    }

    async fn clear(&self) -> Result<(), TraitError> {
        match tokio::fs::remove_file(&self.file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

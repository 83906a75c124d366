//! Article text extraction.

use async_trait::async_trait;

use crate::error::ExtractionError;

/// Trait for turning an article URL into body text.
///
/// Returns non-empty, trimmed lines in document order. An empty vector is a
/// valid result for a page with no extractable text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Fetch `url` and extract its body text.
    async fn extract(&self, url: &str) -> Result<Vec<String>, ExtractionError>;
}

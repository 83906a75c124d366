//! # FundPulse Traits
//!
//! Trait definitions for the collaborators of the FundPulse pipeline.
//!
//! This crate contains ONLY trait definitions and the plain data they exchange.
//! All implementations are in separate crates.
//!
//! ## Module Structure
//!
//! - [`search`]: News search ([`SearchClient`])
//! - [`extraction`]: Article text extraction ([`TextExtractor`])
//! - [`sentiment`]: Sentiment scoring ([`SentimentClient`])
//! - [`storage`]: Article cache and current-fund persistence ([`ArticleCache`], [`SnapshotStore`])
//! - [`fund_data`]: Fund snapshots from a data provider ([`FundSource`])
//!
//! ## Dependency Injection
//!
//! The predictor receives these traits as trait objects:
//!
//! ```ignore
//! HoldingsPredictor::builder()
//!     .with_search(Arc::new(GoogleNewsSearch::new(..)?))
//!     .with_extractor(Arc::new(ArticleExtractor::new(..)?))
//!     .with_sentiment(Arc::new(GoogleLanguageClient::new(..)?))
//!     .with_cache(Arc::new(RedbArticleCache::open(..)?))
//!     .build()
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod extraction;
pub mod fund_data;
pub mod search;
pub mod sentiment;
pub mod storage;

// Re-export commonly used types
pub use error::{ExtractionError, SearchError, SentimentServiceError, TraitError};
pub use extraction::TextExtractor;
pub use fund_data::FundSource;
pub use search::{DateWindow, SearchClient, SearchResult};
pub use sentiment::{SentimentClient, SentimentScore};
pub use storage::{ArticleCache, ArticleSummary, CachedArticle, SnapshotStore};

//! # FundPulse Extract
//!
//! Turns a news article URL into its body text.
//!
//! ## Pipeline
//!
//! ```text
//! URL ─> PageFetcher ─> charset detection ─> Html
//!                                             │
//!          ┌──────────────────────────────────┘
//!          v
//!   DensityStrategy ──(empty)──> ArticleBodyStrategy ──(empty)──> TitleStrategy
//!          │                            │                               │
//!          └────────────────────────────┴──> split into trimmed lines <─┘
//! ```
//!
//! Each strategy returns `None` instead of failing, so the chain is a plain
//! ordered list. Only fetching can fail, with an
//! [`ExtractionError`](fundpulse_traits::ExtractionError).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod charset;
pub mod config;
pub mod extractor;
pub mod fetch;
pub mod stopwords;
pub mod strategy;

pub use config::ExtractorConfig;
pub use extractor::{split_lines, ArticleExtractor};
pub use fetch::{FetchedPage, HttpPageFetcher, PageFetcher};
pub use stopwords::{Language, StopWords};
pub use strategy::{ArticleBodyStrategy, DensityStrategy, ExtractionStrategy, TitleStrategy};

//! # FundPulse Ext File
//!
//! File-based and in-memory storage for FundPulse.
//!
//! - [`JsonArticleCache`]: article cache persisted as one JSON document shaped
//!   `{ subject: { url: { title, content } } }`
//! - [`MemoryArticleCache`]: process-local cache for tests and dry runs
//! - [`JsonSnapshotStore`]: the currently selected fund as a JSON file
//!
//! For the embedded database backend, use `fundpulse-ext-redb`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod article_cache;
mod snapshot;

pub use article_cache::*;
pub use snapshot::*;

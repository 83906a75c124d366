//! # FundPulse Engine
//!
//! The holdings-weighted sentiment predictor.
//!
//! This crate provides:
//! - [`HoldingsPredictor`]: runs search, extraction, caching and scoring per holding
//!   and aggregates the weighted fund prediction
//! - [`PredictorBuilder`]: wires the predictor to its collaborators
//! - [`SentimentAccumulator`]: the per-holding document sent for scoring
//!
//! ## Architecture
//!
//! ```text
//! FundSnapshot ─> Holding ─> SearchClient ─> SearchResult*
//!                                                │
//!                                                v
//!                      ArticleCache <─── TextExtractor
//!                                                │
//!                                                v
//!                                     SentimentAccumulator ─> SentimentClient
//!                                                                   │
//!                    FundPrediction <── sum(score * weight) / 100 <─┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut predictor = HoldingsPredictor::builder()
//!     .with_search(search)
//!     .with_extractor(extractor)
//!     .with_sentiment(sentiment)
//!     .with_cache(cache)
//!     .build()?;
//!
//! predictor.set_fund(snapshot);
//! let prediction = predictor.predict_all().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulator;
pub mod builder;
pub mod config;
pub mod error;
pub mod predictor;

// Re-exports
pub use accumulator::SentimentAccumulator;
pub use builder::PredictorBuilder;
pub use config::PredictorConfig;
pub use error::EngineError;
pub use predictor::{HoldingsPredictor, PhaseObserver, PredictorPhase};

//! # FundPulse Core
//!
//! Core domain types for the FundPulse sentiment pipeline.
//!
//! - **Holdings**: [`Holding`] and the immutable [`FundSnapshot`] they belong to
//! - **Analysis**: per-holding [`HoldingAnalysis`], fund-level [`PredictionContribution`]
//!   and [`FundPrediction`], and the per-run [`AnalysisStatistics`]
//!
//! ## Example
//!
//! ```rust
//! use fundpulse_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let snapshot = FundSnapshot::builder("161725", "Example Fund")
//!     .holding(Holding::new("600519", "Kweichow Moutai", dec!(14.2)).unwrap())
//!     .build();
//!
//! assert!(snapshot.find_holding("Kweichow Moutai").is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod error;
pub mod holding;

pub use analysis::{
    AnalysisStatistics, ContributionStatus, FailedLink, FundPrediction, HoldingAnalysis,
    PredictionContribution,
};
pub use error::{CoreError, CoreResult};
pub use holding::{FundSnapshot, FundSnapshotBuilder, Holding, YieldPeriod};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analysis::{
        AnalysisStatistics, ContributionStatus, FailedLink, FundPrediction, HoldingAnalysis,
        PredictionContribution,
    };
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::holding::{FundSnapshot, Holding, YieldPeriod};
}

//! CLI command implementations.

pub mod articles;
pub mod check;
pub mod config;
pub mod fund;
pub mod holdings;
pub mod logs;
pub mod predict;
pub mod yields;

// Re-export submodules for convenience
pub use articles::ArticlesArgs;
pub use check::CheckArgs;
pub use config::ConfigArgs;
pub use fund::FundArgs;
pub use logs::LogsArgs;
pub use predict::PredictArgs;

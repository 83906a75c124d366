//! Predictor configuration.

use serde::{Deserialize, Serialize};

use fundpulse_traits::DateWindow;

/// Search settings applied to every holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Search results requested per holding
    #[serde(default = "default_results_per_holding")]
    pub results_per_holding: usize,

    /// How far back the news search looks
    #[serde(default)]
    pub date_window: DateWindow,
}

fn default_results_per_holding() -> usize {
    10
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            results_per_holding: default_results_per_holding(),
            date_window: DateWindow::default(),
        }
    }
}

impl PredictorConfig {
    /// Override the result count.
    pub fn with_results_per_holding(mut self, results: usize) -> Self {
        self.results_per_holding = results;
        self
    }

    /// Override the date window.
    pub fn with_date_window(mut self, window: DateWindow) -> Self {
        self.date_window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.results_per_holding, 10);
        assert_eq!(config.date_window, DateWindow::Week);
    }
}

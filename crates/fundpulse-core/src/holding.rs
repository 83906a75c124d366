//! Holdings and fund snapshots.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// HOLDING
// =============================================================================

/// One equity position in a fund's portfolio.
///
/// `weight` is in percentage units (5.23 means 5.23% of the portfolio).
/// Weights across a fund need not sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHolding")]
pub struct Holding {
    /// Exchange code of the stock (e.g. "600519")
    pub code: String,
    /// Display name, also used as the news search query
    pub name: String,
    /// Portfolio weight in percent
    pub weight: Decimal,
}

impl Holding {
    /// Create a holding, rejecting blank identifiers and negative weights.
    pub fn new(code: impl Into<String>, name: impl Into<String>, weight: Decimal) -> CoreResult<Self> {
        let code = code.into().trim().to_string();
        let name = name.into().trim().to_string();

        if code.is_empty() {
            return Err(CoreError::InvalidHolding {
                reason: format!("empty code for '{}'", name),
            });
        }
        if name.is_empty() {
            return Err(CoreError::InvalidHolding {
                reason: format!("empty name for code {}", code),
            });
        }
        if weight.is_sign_negative() && !weight.is_zero() {
            return Err(CoreError::NegativeWeight { code, weight });
        }

        Ok(Self { code, name, weight })
    }

    /// Parse a percentage string such as `"5.23%"` or `" 5.23 "` into a weight.
    pub fn parse_weight(input: &str) -> CoreResult<Decimal> {
        let trimmed = input.trim().trim_end_matches('%').trim();
        Decimal::from_str(trimmed).map_err(|_| CoreError::InvalidWeight {
            input: input.to_string(),
        })
    }

    /// True if `identifier` names this holding by code or by name.
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.code == identifier || self.name == identifier
    }
}

/// Unvalidated wire form of [`Holding`].
#[derive(Deserialize)]
struct RawHolding {
    code: String,
    name: String,
    weight: Decimal,
}

impl TryFrom<RawHolding> for Holding {
    type Error = CoreError;

    fn try_from(raw: RawHolding) -> CoreResult<Self> {
        Holding::new(raw.code, raw.name, raw.weight)
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}%)", self.name, self.code, self.weight)
    }
}

// =============================================================================
// YIELD PERIODS
// =============================================================================

/// Trailing period of a fund yield metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum YieldPeriod {
    /// Trailing month
    OneMonth,
    /// Trailing three months
    ThreeMonths,
    /// Trailing six months
    SixMonths,
    /// Trailing year
    OneYear,
}

impl YieldPeriod {
    /// All periods, shortest first.
    pub fn all() -> &'static [YieldPeriod] {
        &[
            YieldPeriod::OneMonth,
            YieldPeriod::ThreeMonths,
            YieldPeriod::SixMonths,
            YieldPeriod::OneYear,
        ]
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            YieldPeriod::OneMonth => "1 month",
            YieldPeriod::ThreeMonths => "3 months",
            YieldPeriod::SixMonths => "6 months",
            YieldPeriod::OneYear => "1 year",
        }
    }
}

impl fmt::Display for YieldPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// FUND SNAPSHOT
// =============================================================================

/// A fund's identity, yields and holdings as loaded for one session.
///
/// Snapshots are immutable once built. Selecting another fund replaces the
/// snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundSnapshot {
    code: String,
    name: String,
    yields: BTreeMap<YieldPeriod, f64>,
    holdings: Vec<Holding>,
}

impl FundSnapshot {
    /// Start building a snapshot.
    pub fn builder(code: impl Into<String>, name: impl Into<String>) -> FundSnapshotBuilder {
        FundSnapshotBuilder {
            code: code.into(),
            name: name.into(),
            yields: BTreeMap::new(),
            holdings: Vec::new(),
        }
    }

    /// External fund identifier.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Fund name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Yield metrics in percent, keyed by period.
    pub fn yields(&self) -> &BTreeMap<YieldPeriod, f64> {
        &self.yields
    }

    /// Yield for one period, if the source reported it.
    pub fn yield_for(&self, period: YieldPeriod) -> Option<f64> {
        self.yields.get(&period).copied()
    }

    /// Holdings in source order.
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Resolve a holding by code or name.
    ///
    /// Codes are checked before names so a name that happens to look like
    /// another holding's code cannot shadow it.
    pub fn find_holding(&self, identifier: &str) -> Option<&Holding> {
        let identifier = identifier.trim();
        self.holdings
            .iter()
            .find(|h| h.code == identifier)
            .or_else(|| self.holdings.iter().find(|h| h.name == identifier))
    }

    /// Sum of all holding weights in percent.
    pub fn total_weight(&self) -> Decimal {
        self.holdings.iter().map(|h| h.weight).sum()
    }
}

/// Builder for [`FundSnapshot`].
#[derive(Debug, Clone)]
pub struct FundSnapshotBuilder {
    code: String,
    name: String,
    yields: BTreeMap<YieldPeriod, f64>,
    holdings: Vec<Holding>,
}

impl FundSnapshotBuilder {
    /// Record a yield metric.
    pub fn yield_metric(mut self, period: YieldPeriod, percent: f64) -> Self {
        self.yields.insert(period, percent);
        self
    }

    /// Append a holding.
    pub fn holding(mut self, holding: Holding) -> Self {
        self.holdings.push(holding);
        self
    }

    /// Append several holdings.
    pub fn holdings(mut self, holdings: impl IntoIterator<Item = Holding>) -> Self {
        self.holdings.extend(holdings);
        self
    }

    /// Finish the snapshot.
    pub fn build(self) -> FundSnapshot {
        FundSnapshot {
            code: self.code,
            name: self.name,
            yields: self.yields,
            holdings: self.holdings,
        }
    }
}

//! Eastmoney fund data source.
//!
//! Two documents describe a fund:
//! - `pingzhongdata/<code>.js`: a script of `var <name> = <json>;` assignments
//!   holding the fund name, holding codes and trailing yields
//! - `<code>.html`: the fund page, whose `#quotationItem_DataTable` lists the
//!   top holdings with their weights

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, info, warn};

use fundpulse_core::{FundSnapshot, Holding, YieldPeriod};
use fundpulse_traits::{FundSource, TraitError};

use crate::client::{build_client, HttpConfig};
use crate::error::FundDataError;

/// Default provider host.
pub const EASTMONEY_BASE_URL: &str = "http://fund.eastmoney.com";

const VAR_FUND_NAME: &str = "fS_name";
const VAR_STOCK_CODES: &str = "stockCodes";

const YIELD_VARS: &[(&str, YieldPeriod)] = &[
    ("syl_1y", YieldPeriod::OneMonth),
    ("syl_3y", YieldPeriod::ThreeMonths),
    ("syl_6y", YieldPeriod::SixMonths),
    ("syl_1n", YieldPeriod::OneYear),
];

// =============================================================================
// SCRIPT PARSING
// =============================================================================

/// Values read from a fund's data script.
#[derive(Debug, Clone, PartialEq)]
pub struct FundScript {
    /// Fund name
    pub name: String,
    /// Holding codes in table order, market suffix removed
    pub stock_codes: Vec<String>,
    /// Yields that were present and numeric
    pub yields: Vec<(YieldPeriod, f64)>,
}

/// Locate the raw JSON text assigned by `var <name> = ...;`.
fn raw_variable<'a>(script: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("var {}", name);
    let mut from = 0;
    while let Some(pos) = script[from..].find(&needle) {
        let after_name = from + pos + needle.len();
        let rest = script[after_name..].trim_start();
        // `var fS_name` must not match `var fS_name_other`.
        if let Some(value) = rest.strip_prefix('=') {
            return Some(json_prefix(value.trim_start()));
        }
        from = after_name;
    }
    None
}

/// The leading JSON value of `text`, ending at the first top-level `;` or newline.
fn json_prefix(text: &str) -> &str {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ';' | '\n' if depth == 0 => return text[..i].trim_end(),
            _ => {}
        }
    }
    text.trim_end()
}

/// Parse `var <name> = <json>;` from a script.
pub fn script_variable(script: &str, name: &str) -> Result<Value, FundDataError> {
    let raw = raw_variable(script, name)
        .ok_or_else(|| FundDataError::MissingVariable(name.to_string()))?;
    serde_json::from_str(raw).map_err(|e| FundDataError::InvalidVariable {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn yield_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read the fund name, holding codes and yields from a data script.
///
/// The name is required. Missing or non-numeric yields are skipped.
pub fn parse_fund_script(script: &str) -> Result<FundScript, FundDataError> {
    let name = match script_variable(script, VAR_FUND_NAME)? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        other => {
            return Err(FundDataError::InvalidVariable {
                name: VAR_FUND_NAME.to_string(),
                message: format!("expected a non-empty string, got {}", other),
            })
        }
    };

    let stock_codes = match script_variable(script, VAR_STOCK_CODES) {
        Ok(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(strip_market_suffix)
            .collect(),
        Ok(_) | Err(FundDataError::MissingVariable(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let yields = YIELD_VARS
        .iter()
        .filter_map(|(var, period)| {
            let value = script_variable(script, var).ok()?;
            yield_value(&value).map(|v| (*period, v))
        })
        .collect();

    Ok(FundScript {
        name,
        stock_codes,
        yields,
    })
}

/// `"6005191"` → `"600519"`: the last digit is the exchange marker.
fn strip_market_suffix(code: &str) -> String {
    let code = code.trim();
    let mut chars = code.chars();
    chars.next_back();
    chars.as_str().to_string()
}

// =============================================================================
// HOLDINGS TABLE
// =============================================================================

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parse the holdings table of a fund page.
///
/// Rows are read from the first table inside `#quotationItem_DataTable`,
/// skipping the header row. Column 0 is the name, column 1 the weight
/// (`"5.23%"`), column 2 carries the code in its `stockcode` attribute
/// (`"stock_600519"`). When that attribute is absent the code is taken from
/// `fallback_codes` at the same row index. Rows that cannot be parsed are
/// skipped with a warning.
pub fn parse_holdings_table(html: &str, fallback_codes: &[String]) -> Vec<Holding> {
    let (Some(container), Some(table), Some(rows), Some(cells)) = (
        selector("#quotationItem_DataTable"),
        selector("table"),
        selector("tr"),
        selector("td"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let Some(table) = document
        .select(&container)
        .next()
        .and_then(|c| c.select(&table).next())
    else {
        warn!("Holdings table not found on fund page");
        return Vec::new();
    };

    let mut holdings = Vec::new();
    for (index, row) in table.select(&rows).skip(1).enumerate() {
        let columns: Vec<ElementRef<'_>> = row.select(&cells).collect();
        if columns.len() < 2 {
            continue;
        }

        let name = cell_text(columns[0]);
        let weight = match Holding::parse_weight(&cell_text(columns[1])) {
            Ok(w) => w,
            Err(e) => {
                warn!(row = index, holding = %name, error = %e, "Skipping holdings row");
                continue;
            }
        };
        let code = columns
            .get(2)
            .and_then(|c| c.value().attr("stockcode"))
            .map(|attr| attr.trim().trim_start_matches("stock_").to_string())
            .filter(|c| !c.is_empty())
            .or_else(|| fallback_codes.get(index).cloned());

        let Some(code) = code else {
            warn!(row = index, holding = %name, "Skipping holdings row without a code");
            continue;
        };

        match Holding::new(code, name, weight) {
            Ok(holding) => holdings.push(holding),
            Err(e) => warn!(row = index, error = %e, "Skipping holdings row"),
        }
    }

    holdings
}

// =============================================================================
// SOURCE
// =============================================================================

/// Fund data from eastmoney.com.
pub struct EastmoneyFundSource {
    client: reqwest::Client,
    base_url: String,
}

impl EastmoneyFundSource {
    /// Source against the public provider host.
    pub fn new(config: &HttpConfig) -> Result<Self, TraitError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: EASTMONEY_BASE_URL.to_string(),
        })
    }

    /// Override the provider host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the fund's data script.
    pub fn script_url(&self, fund_code: &str) -> String {
        format!("{}/pingzhongdata/{}.js", self.base_url, fund_code)
    }

    /// URL of the fund's page.
    pub fn page_url(&self, fund_code: &str) -> String {
        format!("{}/{}.html", self.base_url, fund_code)
    }

    async fn fetch_text(&self, fund_code: &str, url: &str) -> Result<String, FundDataError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FundDataError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FundDataError::UnknownFund(fund_code.to_string()));
        }
        if !status.is_success() {
            return Err(FundDataError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FundDataError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch and assemble a snapshot.
    pub async fn fetch_snapshot(&self, fund_code: &str) -> Result<FundSnapshot, FundDataError> {
        let fund_code = fund_code.trim();
        let script = self
            .fetch_text(fund_code, &self.script_url(fund_code))
            .await?;
        let parsed = parse_fund_script(&script)?;
        debug!(fund = fund_code, name = %parsed.name, "Parsed fund script");

        let page = self.fetch_text(fund_code, &self.page_url(fund_code)).await?;
        let holdings = parse_holdings_table(&page, &parsed.stock_codes);

        let mut builder = FundSnapshot::builder(fund_code, parsed.name).holdings(holdings);
        for (period, value) in parsed.yields {
            builder = builder.yield_metric(period, value);
        }
        let snapshot = builder.build();

        info!(
            fund = fund_code,
            holdings = snapshot.holdings().len(),
            total_weight = %snapshot.total_weight(),
            "Loaded fund snapshot"
        );
        if snapshot.holdings().is_empty() {
            warn!(fund = fund_code, "Fund has no parseable holdings");
        }
        Ok(snapshot)
    }
}

#[async_trait]
impl FundSource for EastmoneyFundSource {
    fn source_name(&self) -> &'static str {
        "eastmoney"
    }

    async fn load_snapshot(&self, fund_code: &str) -> Result<FundSnapshot, TraitError> {
        Ok(self.fetch_snapshot(fund_code).await?)
    }
}

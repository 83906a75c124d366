//! # FundPulse Ext Http
//!
//! HTTP adapters for the external services FundPulse talks to.
//!
//! - [`EastmoneyFundSource`]: fund identity, yields and holdings ([`FundSource`](fundpulse_traits::FundSource))
//! - [`GoogleNewsSearch`]: news search results ([`SearchClient`](fundpulse_traits::SearchClient))
//! - [`GoogleLanguageClient`]: document sentiment ([`SentimentClient`](fundpulse_traits::SentimentClient))
//! - [`ConnectivityChecker`]: health checks for all of the above
//!
//! Response parsing is done by plain functions over the response text so it
//! can be tested without a network.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod connectivity;
mod eastmoney;
mod error;
mod google_language;
mod google_search;

#[cfg(test)]
mod test_support;

pub use client::{build_client, HttpConfig, DEFAULT_USER_AGENT};
pub use connectivity::{ConnectivityChecker, CheckResult, CheckTarget};
pub use eastmoney::{parse_fund_script, parse_holdings_table, EastmoneyFundSource, FundScript};
pub use error::FundDataError;
pub use google_language::{GoogleLanguageClient, GOOGLE_LANGUAGE_URL};
pub use google_search::{parse_search_results, search_url, GoogleNewsSearch};

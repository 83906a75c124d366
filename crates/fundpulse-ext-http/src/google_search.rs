//! Google News search over the HTML results page.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use fundpulse_traits::{DateWindow, SearchClient, SearchError, SearchResult, TraitError};

use crate::client::{build_client, HttpConfig};

/// Default search endpoint.
pub const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// Result count Google uses when `num` is not given.
const PROVIDER_DEFAULT_RESULTS: usize = 10;

/// Build the news search URL for `query`.
///
/// `num` is only sent when it differs from the provider default.
pub fn search_url(
    base: &str,
    query: &str,
    max_results: usize,
    window: DateWindow,
) -> Result<Url, SearchError> {
    let mut params = vec![
        ("q", query.to_string()),
        ("tbs", format!("qdr:{}", window.code())),
        ("tbm", "nws".to_string()),
    ];
    if max_results != PROVIDER_DEFAULT_RESULTS {
        params.push(("num", max_results.to_string()));
    }
    Url::parse_with_params(base, &params).map_err(|e| SearchError::InvalidQuery(e.to_string()))
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn is_google_host(url: &Url) -> bool {
    url.host_str()
        .map(|h| h == "google.com" || h.ends_with(".google.com") || h.starts_with("google."))
        .unwrap_or(false)
}

/// Resolve a result anchor's `href` to the article URL.
///
/// `/url?q=<target>&sa=...` redirects are unwrapped (the query parser
/// percent-decodes the target). Direct links are accepted only when
/// `allow_direct` is set. Only http(s) targets outside Google are kept.
fn resolve_href(href: &str, allow_direct: bool) -> Option<String> {
    let base = Url::parse("https://www.google.com/").ok()?;
    let link = base.join(href.trim()).ok()?;

    let target = if link.path() == "/url" && is_google_host(&link) {
        link.query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .map(|(_, v)| v.into_owned())?
    } else if allow_direct {
        link.to_string()
    } else {
        return None;
    };

    let target = Url::parse(&target).ok()?;
    let is_web = matches!(target.scheme(), "http" | "https");
    if is_web && !is_google_host(&target) {
        Some(target.to_string())
    } else {
        None
    }
}

/// Trim a result title and drop the ellipsis Google appends to long ones.
fn clean_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches('…')
        .trim_end_matches("...")
        .trim()
        .to_string()
}

fn anchor_title(anchor: ElementRef<'_>, headings: &Selector) -> (String, bool) {
    match anchor.select(headings).next() {
        Some(heading) => (clean_title(&heading.text().collect::<String>()), true),
        None => (clean_title(&anchor.text().collect::<String>()), false),
    }
}

/// Parse a news results page into at most `max_results` results.
///
/// Results keep page order; repeated URLs keep their first occurrence.
pub fn parse_search_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let (Some(anchors), Some(headings)) = (
        selector("a[href]"),
        selector("h3, [role=\"heading\"]"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for anchor in document.select(&anchors) {
        if results.len() >= max_results {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let (title, has_heading) = anchor_title(anchor, &headings);
        if title.is_empty() {
            continue;
        }
        let Some(url) = resolve_href(href, has_heading) else {
            continue;
        };
        if seen.insert(url.clone()) {
            results.push(SearchResult::new(title, url));
        }
    }

    results
}

/// [`SearchClient`] over Google's news vertical.
pub struct GoogleNewsSearch {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleNewsSearch {
    /// Search client against the public endpoint.
    pub fn new(config: &HttpConfig) -> Result<Self, TraitError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: GOOGLE_SEARCH_URL.to_string(),
        })
    }

    /// Override the endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchClient for GoogleNewsSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        window: DateWindow,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery("empty query".to_string()));
        }
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let url = search_url(&self.base_url, query, max_results, window)?;
        debug!(query, %window, url = %url, "Searching news");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(query, "No results were found. Did the rate limit exceed?");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let results = parse_search_results(&body, max_results);
        if results.is_empty() {
            warn!(query, "No results were found. Did the rate limit exceed?");
        } else {
            debug!(query, results = results.len(), "Search returned results");
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"<html><body>
        <a href="https://accounts.google.com/ServiceLogin">Sign in</a>
        <div class="g">
          <a href="/url?q=https://finance.example.com/news/1%3Fid%3D7&amp;sa=U&amp;ved=abc">
            <h3>贵州茅台一季度营收增长 ...</h3>
          </a>
        </div>
        <div class="g">
          <a href="/url?q=https://news.example.org/a&amp;sa=U"><div role="heading">Liquor stocks   rally</div></a>
        </div>
        <div class="g">
          <a href="/url?q=https://finance.example.com/news/1%3Fid%3D7&amp;sa=U"><h3>Duplicate</h3></a>
        </div>
        <div class="g">
          <a href="https://direct.example.net/story"><h3>Direct story…</h3></a>
        </div>
        <a href="/search?q=next&amp;start=10">Next</a>
        <a href="/url?q=ftp://files.example.com/x&amp;sa=U"><h3>Not web</h3></a>
    </body></html>"#;

    #[test]
    fn test_search_url_params() {
        let url = search_url(GOOGLE_SEARCH_URL, "贵州茅台", 10, DateWindow::Week).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "贵州茅台".to_string()),
                ("tbs".to_string(), "qdr:w".to_string()),
                ("tbm".to_string(), "nws".to_string()),
            ]
        );

        let url = search_url(GOOGLE_SEARCH_URL, "moutai", 5, DateWindow::Day).unwrap();
        assert!(url.as_str().ends_with("tbs=qdr%3Ad&tbm=nws&num=5"));
    }

    #[test]
    fn test_parse_results_unwraps_redirects() {
        let results = parse_search_results(RESULTS_PAGE, 10);

        assert_eq!(
            results,
            vec![
                SearchResult::new(
                    "贵州茅台一季度营收增长",
                    "https://finance.example.com/news/1?id=7"
                ),
                SearchResult::new("Liquor stocks rally", "https://news.example.org/a"),
                SearchResult::new("Direct story", "https://direct.example.net/story"),
            ]
        );
    }

    #[test]
    fn test_parse_results_truncates() {
        let results = parse_search_results(RESULTS_PAGE, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://finance.example.com/news/1?id=7");
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_search_results("<html><body>Our systems have detected unusual traffic</body></html>", 10).is_empty());
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Fund  flows ... "), "Fund flows");
        assert_eq!(clean_title("Headline…"), "Headline");
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let search = GoogleNewsSearch::new(&HttpConfig::default()).unwrap();
        let err = search.search("   ", 10, DateWindow::Week).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    fn local_search(base: &str) -> GoogleNewsSearch {
        GoogleNewsSearch::new(&HttpConfig::default())
            .unwrap()
            .with_base_url(format!("{}/search", base))
    }

    #[tokio::test]
    async fn test_rate_limited_search_is_empty() {
        let base = crate::test_support::serve_once(
            "429 Too Many Requests",
            "Our systems have detected unusual traffic",
        )
        .await;
        let results = local_search(&base)
            .search("贵州茅台", 10, DateWindow::Week)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let base = crate::test_support::serve_once("500 Internal Server Error", "").await;
        let err = local_search(&base)
            .search("贵州茅台", 10, DateWindow::Week)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn test_results_from_local_page() {
        let base = crate::test_support::serve_once("200 OK", RESULTS_PAGE).await;
        let results = local_search(&base)
            .search("贵州茅台", 10, DateWindow::Week)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }
}

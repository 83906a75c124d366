//! The article extractor: fetch, decode, then run the strategy chain.

use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, info};

use fundpulse_traits::{ExtractionError, TextExtractor, TraitError};

use crate::charset::decode_html;
use crate::config::ExtractorConfig;
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::stopwords::Language;
use crate::strategy::{ArticleBodyStrategy, DensityStrategy, ExtractionStrategy, TitleStrategy};

/// Split text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extracts article text from news URLs.
///
/// The first strategy that yields non-empty text wins. A page where every
/// strategy comes up empty extracts to zero lines, which is not an error.
pub struct ArticleExtractor {
    fetcher: Arc<dyn PageFetcher>,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ArticleExtractor {
    /// Extractor over HTTP with the default strategy chain.
    pub fn new(config: &ExtractorConfig) -> Result<Self, TraitError> {
        let fetcher = HttpPageFetcher::new(config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config.language))
    }

    /// Extractor over a custom fetcher with the default strategy chain.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, language: Language) -> Self {
        Self::with_strategies(fetcher, Self::default_strategies(language))
    }

    /// Extractor with an explicit strategy chain.
    pub fn with_strategies(
        fetcher: Arc<dyn PageFetcher>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            fetcher,
            strategies,
        }
    }

    /// Density, then article containers, then the page title.
    pub fn default_strategies(language: Language) -> Vec<Box<dyn ExtractionStrategy>> {
        vec![
            Box::new(DensityStrategy::new(language)),
            Box::new(ArticleBodyStrategy),
            Box::new(TitleStrategy),
        ]
    }

    /// Run the strategy chain over already-decoded HTML.
    pub fn extract_from_html(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        self.strategies
            .iter()
            .find_map(|strategy| {
                let text = strategy.extract(&document)?;
                let lines = split_lines(&text);
                if lines.is_empty() {
                    None
                } else {
                    debug!(strategy = strategy.name(), lines = lines.len(), "Strategy matched");
                    Some(lines)
                }
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ArticleExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("ArticleExtractor")
            .field("strategies", &names)
            .finish()
    }
}

#[async_trait]
impl TextExtractor for ArticleExtractor {
    async fn extract(&self, url: &str) -> Result<Vec<String>, ExtractionError> {
        let page = self.fetcher.fetch(url).await?;
        let html = decode_html(&page.body, page.content_type.as_deref());
        let lines = self.extract_from_html(&html);
        info!(url, lines = lines.len(), "Extracted article");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedPage;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeFetcher {
        pages: HashMap<String, FetchedPage>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn page(mut self, url: &str, body: Vec<u8>, content_type: Option<&str>) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchedPage {
                    url: url.to_string(),
                    body,
                    content_type: content_type.map(str::to_string),
                },
            );
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, ExtractionError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ExtractionError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    struct FixedStrategy(&'static str, Option<&'static str>);

    impl ExtractionStrategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _document: &Html) -> Option<String> {
            self.1.map(str::to_string)
        }
    }

    #[test]
    fn test_split_lines_trims_and_drops_empty() {
        assert_eq!(
            split_lines("  first \n\n\t\nsecond\n   "),
            vec!["first".to_string(), "second".to_string()]
        );
        assert!(split_lines("   \n ").is_empty());
    }

    #[test]
    fn test_chain_skips_empty_strategies() {
        let extractor = ArticleExtractor::with_strategies(
            Arc::new(FakeFetcher::new()),
            vec![
                Box::new(FixedStrategy("none", None)),
                Box::new(FixedStrategy("blank", Some("  \n  "))),
                Box::new(FixedStrategy("hit", Some("line one\nline two"))),
                Box::new(FixedStrategy("unused", Some("never"))),
            ],
        );

        assert_eq!(
            extractor.extract_from_html("<html></html>"),
            vec!["line one".to_string(), "line two".to_string()]
        );
    }

    #[test]
    fn test_article_body_used_when_density_is_empty() {
        let extractor =
            ArticleExtractor::with_fetcher(Arc::new(FakeFetcher::new()), Language::English);
        let html = r#"<html><head><title>Headline</title></head><body>
            <article><p>Shares rose.</p><p>Volume doubled.</p></article>
        </body></html>"#;

        assert_eq!(
            extractor.extract_from_html(html),
            vec!["Shares rose.".to_string(), "Volume doubled.".to_string()]
        );
    }

    #[test]
    fn test_title_only_page() {
        let extractor =
            ArticleExtractor::with_fetcher(Arc::new(FakeFetcher::new()), Language::English);
        let html = "<html><head><title> Just a title </title></head><body></body></html>";
        assert_eq!(extractor.extract_from_html(html), vec!["Just a title".to_string()]);
    }

    #[test]
    fn test_nothing_extractable_is_empty() {
        let extractor = ArticleExtractor::with_fetcher(Arc::new(FakeFetcher::new()), Language::English);
        assert!(extractor.extract_from_html("<html><body></body></html>").is_empty());
    }

    #[tokio::test]
    async fn test_extract_decodes_gbk_page() {
        let (body, _, _) = encoding_rs::GBK.encode(
            "<html><head><title>标题</title></head><body><article><p>基金净值上涨</p></article></body></html>",
        );
        let fetcher = FakeFetcher::new().page(
            "https://news.example.com/a",
            body.into_owned(),
            Some("text/html; charset=gbk"),
        );
        let extractor = ArticleExtractor::with_fetcher(Arc::new(fetcher), Language::Chinese);

        let lines = extractor.extract("https://news.example.com/a").await.unwrap();
        assert_eq!(lines, vec!["基金净值上涨".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_propagates_fetch_error() {
        let extractor =
            ArticleExtractor::with_fetcher(Arc::new(FakeFetcher::new()), Language::Chinese);

        let err = extractor
            .extract("https://news.example.com/missing")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Status {
                url: "https://news.example.com/missing".to_string(),
                status: 404
            }
        );
    }
}

//! Body extraction strategies, tried in order.
//!
//! - [`DensityStrategy`]: scores containers by the stopword density of their
//!   paragraphs and returns the best container's paragraphs
//! - [`ArticleBodyStrategy`]: well-known article containers (`<article>`,
//!   `itemprop="articleBody"`, common CMS ids)
//! - [`TitleStrategy`]: the page title, as a last resort

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use crate::stopwords::{Language, StopWords};

/// One way of pulling article text out of a parsed page.
///
/// Strategies never fail; `None` (or empty text) hands over to the next one.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name, for logs.
    fn name(&self) -> &'static str;

    /// Article text with one paragraph per line.
    fn extract(&self, document: &Html) -> Option<String>;
}

/// Elements whose contents are never article text.
const BOILERPLATE: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe",
];

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Element text with runs of whitespace collapsed to single spaces.
fn normalized_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn in_boilerplate(element: ElementRef<'_>) -> bool {
    BOILERPLATE.contains(&element.value().name())
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| BOILERPLATE.contains(&a.value().name()))
}

/// Share of `text` that sits inside links.
fn link_density(element: ElementRef<'_>, text: &str, links: &Selector) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let linked: usize = element
        .select(links)
        .map(|a| normalized_text(a).chars().count())
        .sum();
    linked as f64 / total as f64
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// =============================================================================
// DENSITY
// =============================================================================

/// Picks the container whose paragraphs carry the most stopwords.
///
/// Each qualifying paragraph adds its stopword count to its parent and half of
/// it to its grandparent. Ties go to the container seen first.
#[derive(Debug, Clone)]
pub struct DensityStrategy {
    stopwords: StopWords,
    min_stopwords: usize,
    max_link_density: f64,
}

impl DensityStrategy {
    /// Strategy for pages in `language`.
    pub fn new(language: Language) -> Self {
        Self {
            stopwords: StopWords::for_language(language),
            min_stopwords: 3,
            max_link_density: 0.5,
        }
    }

    /// Minimum stopwords for a paragraph to count.
    pub fn with_min_stopwords(mut self, min: usize) -> Self {
        self.min_stopwords = min;
        self
    }

    fn qualifies(&self, element: ElementRef<'_>, text: &str, links: &Selector) -> bool {
        !text.is_empty()
            && self.stopwords.count(text) >= self.min_stopwords
            && link_density(element, text, links) <= self.max_link_density
    }
}

impl ExtractionStrategy for DensityStrategy {
    fn name(&self) -> &'static str {
        "density"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let candidates = selector("p, pre, td")?;
        let paragraphs = selector("p, pre")?;
        let links = selector("a")?;

        let mut scores: HashMap<_, f64> = HashMap::new();
        let mut order = Vec::new();
        let mut add = |id, weight: f64| {
            let entry = scores.entry(id).or_insert_with(|| {
                order.push(id);
                0.0
            });
            *entry += weight;
        };

        for element in document.select(&candidates) {
            if in_boilerplate(element) {
                continue;
            }
            let text = normalized_text(element);
            if !self.qualifies(element, &text, &links) {
                continue;
            }
            let weight = self.stopwords.count(&text) as f64;
            if let Some(parent) = element.parent() {
                add(parent.id(), weight);
                if let Some(grandparent) = parent.parent() {
                    add(grandparent.id(), weight / 2.0);
                }
            }
        }

        let mut best = None;
        let mut best_score = 0.0;
        for id in &order {
            let score = scores.get(id).copied().unwrap_or(0.0);
            if score > best_score {
                best = Some(*id);
                best_score = score;
            }
        }

        let top = ElementRef::wrap(document.tree.get(best?)?)?;
        let lines: Vec<String> = top
            .select(&paragraphs)
            .filter(|p| !in_boilerplate(*p))
            .map(|p| (p, normalized_text(p)))
            .filter(|(p, text)| {
                !text.is_empty() && link_density(*p, text, &links) <= self.max_link_density
            })
            .map(|(_, text)| text)
            .collect();

        non_empty(lines.join("\n"))
    }
}

// =============================================================================
// ARTICLE BODY
// =============================================================================

/// Containers that conventionally hold the article body.
const ARTICLE_CONTAINERS: &[&str] = &[
    "[itemprop=\"articleBody\"]",
    "article",
    "#artibody",
    "#article",
    ".article-content",
    ".article",
    ".post-content",
    ".entry-content",
    "#content",
    "main",
];

/// Reads the first well-known article container present on the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleBodyStrategy;

impl ExtractionStrategy for ArticleBodyStrategy {
    fn name(&self) -> &'static str {
        "article-body"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let paragraphs = selector("p")?;

        ARTICLE_CONTAINERS
            .iter()
            .filter_map(|css| selector(css))
            .filter_map(|sel| document.select(&sel).next())
            .find_map(|container| {
                let lines: Vec<String> = container
                    .select(&paragraphs)
                    .filter(|p| !in_boilerplate(*p))
                    .map(normalized_text)
                    .filter(|t| !t.is_empty())
                    .collect();
                if lines.is_empty() {
                    non_empty(normalized_text(container))
                } else {
                    Some(lines.join("\n"))
                }
            })
    }
}

// =============================================================================
// TITLE
// =============================================================================

/// Falls back to the page title.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleStrategy;

impl ExtractionStrategy for TitleStrategy {
    fn name(&self) -> &'static str {
        "title"
    }

    fn extract(&self, document: &Html) -> Option<String> {
        let og_title = selector("meta[property=\"og:title\"]")?;
        if let Some(content) = document
            .select(&og_title)
            .filter_map(|m| m.value().attr("content"))
            .map(|c| c.split_whitespace().collect::<Vec<_>>().join(" "))
            .find(|c| !c.is_empty())
        {
            return Some(content);
        }

        ["title", "h1"]
            .iter()
            .filter_map(|css| selector(css))
            .filter_map(|sel| document.select(&sel).next())
            .map(normalized_text)
            .find(|t| !t.is_empty())
    }
}

//! Per-holding text accumulation.

/// Article text gathered for one holding, submitted to the sentiment
/// service as a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentAccumulator {
    articles: Vec<String>,
}

impl SentimentAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one article's text. Blank text is ignored.
    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.trim().is_empty() {
            self.articles.push(text);
        }
    }

    /// Number of articles appended.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// True if nothing was appended.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// All articles joined by newlines, in append order.
    pub fn document(&self) -> String {
        self.articles.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_preserves_order() {
        let mut acc = SentimentAccumulator::new();
        acc.push("Title A\nbody a");
        acc.push("   ");
        acc.push("Title B");

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.document(), "Title A\nbody a\nTitle B");
    }

    #[test]
    fn test_fresh_accumulator_is_empty() {
        assert!(SentimentAccumulator::new().is_empty());
        assert_eq!(SentimentAccumulator::new().document(), "");
    }
}

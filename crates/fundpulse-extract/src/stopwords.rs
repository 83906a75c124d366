//! Stopword lists used to tell prose from navigation text.
//!
//! Body paragraphs are dense in function words; menus, captions and link
//! lists are not. Chinese has no word boundaries, so Chinese stopwords are
//! counted as substring occurrences instead of tokens.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language of the pages being extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese
    #[default]
    Chinese,
    /// English
    English,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "chinese" => Ok(Language::Chinese),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

const CHINESE: &[&str] = &[
    "的", "了", "在", "是", "和", "也", "有", "就", "不", "都", "而", "及", "与", "着", "或",
    "一个", "没有", "我们", "你们", "他们", "她们", "这", "那", "之", "于", "为", "以", "将",
    "对", "从", "被", "把", "等", "但", "并", "还", "又", "让", "给", "向", "由", "因为", "所以",
    "如果", "虽然", "但是", "已经", "可以", "其中", "此外", "同时", "目前", "今年", "表示",
];

const ENGLISH: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "but", "by", "can", "could", "did", "do", "for", "from", "had", "has",
    "have", "he", "her", "his", "how", "if", "in", "into", "is", "it", "its", "more", "most",
    "not", "of", "on", "one", "or", "other", "our", "out", "over", "said", "she", "so",
    "some", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "to", "up", "was", "we", "were", "what", "when", "which", "while", "who", "will", "with",
    "would", "you",
];

/// A stopword set for one language.
#[derive(Debug, Clone)]
pub struct StopWords {
    language: Language,
    words: HashSet<&'static str>,
}

impl StopWords {
    /// Built-in list for `language`.
    pub fn for_language(language: Language) -> Self {
        let list = match language {
            Language::Chinese => CHINESE,
            Language::English => ENGLISH,
        };
        Self {
            language,
            words: list.iter().copied().collect(),
        }
    }

    /// Language of this list.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of stopword occurrences in `text`.
    pub fn count(&self, text: &str) -> usize {
        match self.language {
            Language::Chinese => self.words.iter().map(|w| text.matches(w).count()).sum(),
            Language::English => text
                .split(|c: char| !c.is_alphanumeric() && c != '\'')
                .filter(|token| !token.is_empty())
                .filter(|token| self.words.contains(token.to_lowercase().as_str()))
                .count(),
        }
    }
}

//! Review text normalization
//!
//! Produces the cleaned, display-only copy of a review: markup stripped,
//! case folded, punctuation and digits dropped, stop-words removed.

use moviereview_core::{Error, Result};
use regex::Regex;
use std::collections::HashSet;

/// English stop-words excluded from cleaned text.
///
/// Contractions ("don't", "isn't", ...) are absent: apostrophes are stripped
/// before the filter runs, so only their split-off fragments ("don", "t")
/// can ever match.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Matches HTML-tag-like substrings such as `<br/>` or `<a href="...">`
const TAG_PATTERN: &str = r"<[^>]*>";

/// Deterministic, stateless text cleaner
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    tags: Regex,
    stop_words: HashSet<&'static str>,
}

impl TextNormalizer {
    /// Create a normalizer over the built-in English stop-word set
    pub fn new() -> Result<Self> {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// Create a normalizer over a custom stop-word set.
    ///
    /// Entries are matched against already-lowercased tokens.
    pub fn with_stop_words(words: impl IntoIterator<Item = &'static str>) -> Result<Self> {
        let tags = Regex::new(TAG_PATTERN)
            .map_err(|e| Error::config(format!("Failed to compile tag pattern: {e}")))?;

        Ok(Self {
            tags,
            stop_words: words.into_iter().collect(),
        })
    }

    /// Clean `text` for display.
    ///
    /// Returns an empty string when nothing survives; that is valid output.
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        // A tag separates words, it never joins them
        let untagged = self.tags.replace_all(text, " ");

        // Fold case before filtering so a second pass has nothing left to do
        let stripped: String = untagged
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation() && !c.is_ascii_digit())
            .collect();

        stripped
            .split_whitespace()
            .filter(|token| !self.is_stop_word(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Null-tolerant variant of [`normalize`](Self::normalize)
    pub fn normalize_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.normalize(t)).unwrap_or_default()
    }

    /// Whether `token` is in this normalizer's stop-word set
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

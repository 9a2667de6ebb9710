//! Content extraction types

use thiserror::Error;

/// Errors during content extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no content extracted")]
    NoContent,
    #[error("Content too short: {0} words")]
    TooShort(usize),
}

/// Extracted content from a web page
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Source URL
    pub url: String,
    /// Name of the strategy that produced the text
    pub strategy: &'static str,
    /// Cleaned plain text
    pub text: String,
    /// Word count of `text`
    pub word_count: usize,
    /// Whether the whole-page text fallback was used
    pub used_fallback: bool,
}

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Pages with fewer words are rejected
    pub min_word_count: usize,
    /// Below this many words, fall back to all text on the page
    pub fallback_word_count: usize,
    /// Below this many words, structured Wikipedia text falls back to raw paragraphs
    pub wikipedia_min_words: usize,
    /// Number of leading paragraphs considered for the Wikipedia lead
    pub lead_paragraphs: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_word_count: 10,
            fallback_word_count: 50,
            wikipedia_min_words: 100,
            lead_paragraphs: 3,
        }
    }
}

//! Context assembly, chunking, and answer selection configuration

use serde::{Deserialize, Serialize};

/// Answering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsweringConfig {
    /// Window size in tokens
    pub chunk_size: usize,
    /// Tokens shared by consecutive windows
    pub stride: usize,
    /// Windows shorter than this are not sent to the model
    pub min_chunk_tokens: usize,
    /// Maximum span length in tokens (end lookahead from start)
    pub max_answer_tokens: usize,
    /// Pages with fewer words are not stored or used as context
    pub min_page_words: usize,
    /// Combined context must have at least this many words
    pub min_context_words: usize,
    /// Best span score must exceed this to be returned
    pub score_threshold: f32,
}

impl Default for AnsweringConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            stride: 256,
            min_chunk_tokens: 10,
            max_answer_tokens: 50,
            min_page_words: 10,
            min_context_words: 50,
            score_threshold: -1.0,
        }
    }
}

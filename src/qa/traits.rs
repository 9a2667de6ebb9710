//! Tokenizer and span model seams
//!
//! The answer engine only sees these traits, so the HuggingFace/ONNX
//! implementations can be swapped for deterministic ones in tests.

use std::fmt::Debug;

/// Errors from tokenization or model inference
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    /// Model or tokenizer file missing or unreadable
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Tokenizer failed to encode or decode
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    /// Model execution failed or produced unusable output
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for QA operations
pub type QaResult<T> = Result<T, QaError>;

/// An encoded (question, context) pair, ready for the model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairEncoding {
    pub ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub type_ids: Vec<u32>,
}

impl PairEncoding {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Per-token start and end scores for one pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanLogits {
    pub start: Vec<f32>,
    pub end: Vec<f32>,
}

/// Tokenizer used for context windows and answer decoding
pub trait QaTokenizer: Send + Sync + Debug {
    /// Tokenize the full context without truncation
    fn encode_context(&self, text: &str) -> QaResult<Vec<u32>>;

    /// Encode a (question, context) pair, truncated to the model's input length
    fn encode_pair(&self, question: &str, context: &str) -> QaResult<PairEncoding>;

    /// Turn token ids back into text, dropping special tokens
    fn decode(&self, ids: &[u32]) -> QaResult<String>;
}

/// Extractive QA model producing span logits
pub trait SpanModel: Send + Sync + Debug {
    fn predict(&self, encoding: &PairEncoding) -> QaResult<SpanLogits>;

    /// Model name for logs and health output
    fn name(&self) -> &str;
}

//! HuggingFace tokenizer backend

use std::fmt;
use std::path::Path;

use tokenizers::{Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};
use tracing::info;

use super::traits::{PairEncoding, QaError, QaResult, QaTokenizer};

/// `tokenizer.json` based tokenizer.
///
/// Holds two configured copies: one without truncation for whole contexts,
/// and one truncating (question, context) pairs longest-first.
pub struct HfTokenizer {
    context: Tokenizer,
    pair: Tokenizer,
    max_length: usize,
}

impl fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("max_length", &self.max_length)
            .finish()
    }
}

impl HfTokenizer {
    /// Load a tokenizer file. Pairs are truncated to `max_length` tokens.
    pub fn from_file(path: impl AsRef<Path>, max_length: usize) -> QaResult<Self> {
        let path = path.as_ref();
        info!("Loading tokenizer from {}", path.display());

        let mut context = Tokenizer::from_file(path)
            .map_err(|e| QaError::ModelNotFound(format!("Failed to load tokenizer: {}", e)))?;
        context.with_padding(None);
        context
            .with_truncation(None)
            .map_err(|e| QaError::Config(e.to_string()))?;

        let mut pair = context.clone();
        pair.with_truncation(Some(TruncationParams {
            max_length,
            strategy: TruncationStrategy::LongestFirst,
            stride: 0,
            direction: TruncationDirection::Right,
        }))
        .map_err(|e| QaError::Config(e.to_string()))?;

        Ok(Self {
            context,
            pair,
            max_length,
        })
    }
}

impl QaTokenizer for HfTokenizer {
    fn encode_context(&self, text: &str) -> QaResult<Vec<u32>> {
        let encoding = self
            .context
            .encode(text, true)
            .map_err(|e| QaError::Tokenization(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn encode_pair(&self, question: &str, context: &str) -> QaResult<PairEncoding> {
        let encoding = self
            .pair
            .encode((question, context), true)
            .map_err(|e| QaError::Tokenization(e.to_string()))?;
        Ok(PairEncoding {
            ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            type_ids: encoding.get_type_ids().to_vec(),
        })
    }

    fn decode(&self, ids: &[u32]) -> QaResult<String> {
        self.context
            .decode(ids, true)
            .map_err(|e| QaError::Tokenization(e.to_string()))
    }
}

//! Extractive question answering
//!
//! Features:
//! - Sliding-window inference over contexts longer than the model input
//! - Brute-force start/end span search with answer validation
//! - HuggingFace tokenizer and ONNX Runtime model backends

mod answer;
mod engine;
#[cfg(feature = "onnx")]
mod onnx;
mod scorer;
mod tokenizer;
mod traits;

pub use answer::Answer;
pub use engine::{QaEngine, ScoredSpan};
#[cfg(feature = "onnx")]
pub use onnx::OnnxSpanModel;
pub use scorer::{clean_answer, is_valid_span_text, normalize_question, ranked_candidates, SpanCandidate};
pub use tokenizer::HfTokenizer;
pub use traits::{PairEncoding, QaError, QaResult, QaTokenizer, SpanLogits, SpanModel};

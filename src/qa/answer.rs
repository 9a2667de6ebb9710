//! Answer outcomes

use std::fmt;

/// Outcome of a question against the current context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Cleaned answer span
    Found(String),
    /// No span passed validation and the score threshold
    NotFound,
    /// No context has been assembled yet
    NoContext,
    /// Question is empty or shorter than two characters
    InvalidQuestion,
    /// Tokenizer or model failure
    Failed(String),
}

impl Answer {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(text) => f.write_str(text),
            Self::NotFound => f.write_str(
                "I could not find a specific answer to your question in the provided context.",
            ),
            Self::NoContext => f.write_str("Please provide context before asking questions."),
            Self::InvalidQuestion => f.write_str("Please provide a valid question"),
            Self::Failed(reason) => write!(
                f,
                "An error occurred while processing your question: {}",
                reason
            ),
        }
    }
}

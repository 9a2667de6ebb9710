//! HTTP API Request/Response Types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scraping::FetchStatsSnapshot;
use crate::session::PageSummary;

/// Successful `POST /process_urls` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUrlsResponse {
    /// Always `"success"`
    pub status: String,
    /// Number of distinct URLs in the request
    pub processed_urls: usize,
    /// URL → `"success"` or `"failed - <reason>"`
    pub results: BTreeMap<String, String>,
    /// Words in the rebuilt context
    pub context_words: usize,
}

/// `POST /process_urls` response when no usable context could be built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUrlsError {
    /// Always `"error"`
    pub status: String,
    pub message: String,
    pub results: BTreeMap<String, String>,
}

/// `POST /ask_question` query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskQuery {
    #[serde(default)]
    pub question: Option<String>,
}

/// `POST /ask_question` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Page fetch counters
    pub fetches: FetchStatsSnapshot,
}

/// `GET /pages` response
#[derive(Debug, Clone, Serialize)]
pub struct PagesResponse {
    pub pages: Vec<PageSummary>,
    /// Words in the current context, if one has been built
    pub context_words: Option<usize>,
}

/// UI form: one URL per line
#[derive(Debug, Clone, Deserialize)]
pub struct UrlsForm {
    #[serde(default)]
    pub urls: String,
}

/// UI form: a question
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

//! QA session: owns the fetcher, extractor, page store, current context,
//! and answer engine
//!
//! All request handlers and CLI commands go through a single `QaSession`.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{AnsweringConfig, Config};
use crate::context::{build_context, ContextError, ContextStats, ContextStore};
use crate::qa::{normalize_question, Answer, QaEngine};
use crate::scraping::{
    ContentExtractor, ExtractError, ExtractedContent, ExtractorConfig, FetchConfig, FetchEngine,
    FetchError, FetchStatsSnapshot,
};

/// Why a single URL could not be turned into page text
#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("extraction task failed: {0}")]
    Task(String),
    #[error("content too short to store")]
    NotStored,
}

/// Result of processing one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UrlStatus {
    Success { words: usize },
    Failed { reason: String },
}

/// A URL and what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlOutcome {
    pub url: String,
    #[serde(flatten)]
    pub status: UrlStatus,
}

impl UrlOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, UrlStatus::Success { .. })
    }

    /// `"success"` or `"failed - <reason>"`
    pub fn summary(&self) -> String {
        match &self.status {
            UrlStatus::Success { .. } => "success".to_string(),
            UrlStatus::Failed { reason } => format!("failed - {}", reason),
        }
    }
}

/// Outcome of a `process_urls` batch
#[derive(Debug, Clone)]
pub struct ProcessReport {
    /// One entry per input URL, in input order
    pub outcomes: Vec<UrlOutcome>,
    /// The rebuilt context, or why the previous one was kept
    pub context: Result<ContextStats, ContextError>,
}

impl ProcessReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// URL → summary string
    pub fn results(&self) -> BTreeMap<String, String> {
        self.outcomes
            .iter()
            .map(|o| (o.url.clone(), o.summary()))
            .collect()
    }
}

/// Stored page summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub words: usize,
}

#[derive(Debug, Default)]
struct CurrentContext {
    text: String,
    stats: Option<ContextStats>,
}

/// A question answering session over a growing set of pages
pub struct QaSession {
    fetcher: FetchEngine,
    /// Shared with blocking extraction tasks
    extractor: Arc<ContentExtractor>,
    store: ContextStore,
    context: RwLock<CurrentContext>,
    engine: Option<Arc<QaEngine>>,
    answering: AnsweringConfig,
}

impl QaSession {
    /// Create a session. Without an engine, pages can still be processed but
    /// questions are answered with a failure message.
    pub fn new(config: &Config, engine: Option<QaEngine>) -> Result<Self, FetchError> {
        let fetcher = FetchEngine::new(FetchConfig::from(&config.scraping))?;
        let extractor = ContentExtractor::new(ExtractorConfig {
            min_word_count: config.answering.min_page_words,
            ..Default::default()
        });

        Ok(Self {
            fetcher,
            extractor: Arc::new(extractor),
            store: ContextStore::new(config.answering.min_page_words),
            context: RwLock::new(CurrentContext::default()),
            engine: engine.map(Arc::new),
            answering: config.answering.clone(),
        })
    }

    pub fn has_model(&self) -> bool {
        self.engine.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.engine.as_deref().map(QaEngine::model_name)
    }

    /// Fetch a page and extract its text without storing it
    pub async fn extract_url(&self, url: &str) -> Result<ExtractedContent, PageError> {
        let url = Url::parse(url.trim())?;
        let response = self.fetcher.fetch(&url).await?;

        let extractor = Arc::clone(&self.extractor);
        let final_url = response.final_url;
        let body = response.body;
        let content = tokio::task::spawn_blocking(move || extractor.extract(&body, &final_url))
            .await
            .map_err(|e| PageError::Task(e.to_string()))??;
        Ok(content)
    }

    /// Fetch, extract, and store every URL, then rebuild the context.
    ///
    /// URLs are trimmed before use; the trimmed form is the store key and
    /// the URL reported in the outcome.
    ///
    /// A failing URL is recorded in the report and never stops the batch.
    /// If no usable context can be built, the previous context stays in place.
    pub async fn process_urls(&self, urls: &[String]) -> ProcessReport {
        info!("Processing {} URLs", urls.len());

        let mut outcomes = Vec::with_capacity(urls.len());
        for url in urls {
            let url = url.trim();
            let status = match self.extract_url(url).await {
                Ok(content) => {
                    let words = content.word_count;
                    if self.store.put(url.to_string(), content.text) {
                        debug!(url = %url, words, strategy = content.strategy, "Stored page");
                        UrlStatus::Success { words }
                    } else {
                        warn!("Not storing {}: only {} words", url, words);
                        UrlStatus::Failed {
                            reason: PageError::NotStored.to_string(),
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", url, e);
                    UrlStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(UrlOutcome {
                url: url.to_string(),
                status,
            });
        }

        let context = self.rebuild_context();
        let report = ProcessReport { outcomes, context };
        info!(
            "Processed {} URLs: {} succeeded, {} failed, {} pages stored",
            report.outcomes.len(),
            report.succeeded(),
            report.failed(),
            self.store.len()
        );
        report
    }

    fn rebuild_context(&self) -> Result<ContextStats, ContextError> {
        let pages = self.store.snapshot();
        match build_context(
            &pages,
            self.answering.min_page_words,
            self.answering.min_context_words,
        ) {
            Ok((text, stats)) => {
                info!(
                    "Context updated: {} pages, {} words, {} characters",
                    stats.pages, stats.words, stats.chars
                );
                let mut current = self.context.write();
                current.text = text;
                current.stats = Some(stats);
                Ok(stats)
            }
            Err(e) => {
                warn!("Keeping previous context: {}", e);
                Err(e)
            }
        }
    }

    /// Answer a question against the current context
    pub async fn ask(&self, question: &str) -> Answer {
        let context = self.context.read().text.clone();
        if context.trim().is_empty() {
            return Answer::NoContext;
        }
        if normalize_question(question).is_none() {
            return Answer::InvalidQuestion;
        }
        let Some(engine) = self.engine.clone() else {
            return Answer::Failed("no question answering model is loaded".to_string());
        };

        info!("Question: {}", question);
        let question = question.to_string();
        let answer = tokio::task::spawn_blocking(move || engine.best_answer(&question, &context))
            .await
            .unwrap_or_else(|e| Answer::Failed(format!("answer task failed: {}", e)));
        if answer.is_found() {
            info!("Answer: {}", answer);
        } else {
            warn!("No answer: {}", answer);
        }
        answer
    }

    /// Stored pages in insertion order
    pub fn pages(&self) -> Vec<PageSummary> {
        self.store
            .snapshot()
            .into_iter()
            .map(|p| PageSummary {
                words: p.word_count(),
                url: p.url,
            })
            .collect()
    }

    /// Statistics of the current context, if one has been built
    pub fn context_stats(&self) -> Option<ContextStats> {
        self.context.read().stats
    }

    /// Page fetch counters since the session started
    pub fn fetch_stats(&self) -> FetchStatsSnapshot {
        self.fetcher.stats().snapshot()
    }

    /// Current context text (empty until a batch succeeds)
    pub fn context_text(&self) -> String {
        self.context.read().text.clone()
    }
}

//! Fetch engine for page retrieval
//!
//! A single HTTP GET per URL with a fixed timeout and no retry. Non-2xx
//! responses and oversized bodies are errors so the caller can record a
//! per-URL failure and move on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::ScrapingConfig;

/// Errors that can occur during fetching
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
    #[error("Content too large: {0} bytes")]
    ContentTooLarge(usize),
}

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The fetched URL (may differ from request due to redirects)
    pub final_url: Url,
    /// Response body
    pub body: String,
    /// Content type
    pub content_type: String,
    /// Time taken to fetch
    pub fetch_duration: Duration,
}

/// Configuration for the fetch engine
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum response size (bytes)
    pub max_content_size: usize,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&ScrapingConfig::default())
    }
}

impl From<&ScrapingConfig> for FetchConfig {
    fn from(config: &ScrapingConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_content_size: config.max_content_size,
            max_redirects: 10,
        }
    }
}

/// Fetch statistics
#[derive(Debug, Default)]
pub struct FetchStats {
    /// Total fetch attempts
    pub total_fetches: AtomicU64,
    /// Successful fetches
    pub successes: AtomicU64,
    /// Failed fetches
    pub failures: AtomicU64,
}

impl FetchStats {
    pub fn snapshot(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            total: self.total_fetches.load(Ordering::Relaxed),
            succeeded: self.successes.load(Ordering::Relaxed),
            failed: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`FetchStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStatsSnapshot {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// HTTP fetch engine
pub struct FetchEngine {
    http_client: reqwest::Client,
    config: FetchConfig,
    stats: FetchStats,
}

impl FetchEngine {
    /// Create a new fetch engine
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http_client,
            config,
            stats: FetchStats::default(),
        })
    }

    /// Fetch a URL once
    pub async fn fetch(&self, url: &Url) -> Result<FetchResult, FetchError> {
        self.stats.total_fetches.fetch_add(1, Ordering::Relaxed);

        let result = self.fetch_http(url).await;
        match &result {
            Ok(response) => {
                self.stats.successes.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    "Fetched {} ({}, {} bytes, {:?})",
                    response.final_url,
                    response.content_type,
                    response.body.len(),
                    response.fetch_duration
                );
            }
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Fetch of {} failed: {}", url, e);
            }
        }
        result
    }

    async fn fetch_http(&self, url: &Url) -> Result<FetchResult, FetchError> {
        let start = Instant::now();

        let response = self
            .http_client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let final_url = response.url().clone();

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        // Anything textual is accepted, binary formats are not
        if !content_type.contains("text/")
            && !content_type.contains("application/xhtml")
            && !content_type.contains("application/xml")
        {
            return Err(FetchError::InvalidContentType(content_type));
        }

        if let Some(len) = response.content_length() {
            if len as usize > self.config.max_content_size {
                return Err(FetchError::ContentTooLarge(len as usize));
            }
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        if body.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge(body.len()));
        }

        Ok(FetchResult {
            final_url,
            body,
            content_type,
            fetch_duration: start.elapsed(),
        })
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else {
            FetchError::Http(error)
        }
    }

    /// Get fetch statistics
    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }
}

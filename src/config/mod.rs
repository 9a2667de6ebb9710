//! Configuration for pageqa

mod answering;
mod http;
mod logging;
mod model;
mod scraping;

pub use answering::AnsweringConfig;
pub use http::HttpConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use model::ModelConfig;
pub use scraping::ScrapingConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Default user agent for page fetches
pub const DEFAULT_USER_AGENT: &str = "pageqa/0.1 (+https://github.com/pageqa)";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API server configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Page fetching configuration
    #[serde(default)]
    pub scraping: ScrapingConfig,
    /// Question answering model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Context assembly and answer selection
    #[serde(default)]
    pub answering: AnsweringConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// After deserializing, this validates all fields and resolves model
    /// paths from the model directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        config.model.resolve_paths();
        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let mut config = Config::default();
            config.model.resolve_paths();
            Ok(config)
        }
    }

    /// Serialize to TOML (used by `pageqa init`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
    }

    /// Replace the HTTP listen address (e.g. from `--listen`) and validate
    /// the result.
    pub fn set_listen_addr(&mut self, addr: impl Into<String>) -> Result<()> {
        self.http.listen_addr = addr.into();
        self.validate()
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Answering validation
        let answering = &self.answering;
        if answering.chunk_size < 2 {
            errors.push("chunk_size must be at least 2".to_string());
        }
        if answering.stride >= answering.chunk_size {
            errors.push(format!(
                "stride ({}) must be less than chunk_size ({})",
                answering.stride, answering.chunk_size
            ));
        }
        if answering.max_answer_tokens == 0 {
            errors.push("max_answer_tokens must be positive".to_string());
        }
        if answering.min_context_words < answering.min_page_words {
            errors.push("min_context_words must be >= min_page_words".to_string());
        }

        // Model validation
        if self.model.max_sequence_length == 0 {
            errors.push("max_sequence_length must be positive".to_string());
        }
        if self.model.num_threads == 0 {
            errors.push("num_threads must be positive".to_string());
        }
        if self.model.model_name.is_empty() {
            errors.push("model_name must not be empty".to_string());
        }

        // Scraping validation
        if self.scraping.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if self.scraping.max_content_size == 0 {
            errors.push("max_content_size must be positive".to_string());
        }

        // HTTP config validation
        if !self.http.listen_addr.is_empty() {
            // Extract port from listen_addr (format: "host:port")
            if let Some(port_str) = self.http.listen_addr.rsplit(':').next() {
                if let Ok(port) = port_str.parse::<u32>() {
                    if port == 0 || port > 65535 {
                        errors.push(format!(
                            "HTTP listen port must be between 1 and 65535, got {}",
                            port
                        ));
                    }
                }
            }
            if self.http.listen_addr.parse::<SocketAddr>().is_err() {
                errors.push(format!(
                    "listen_addr '{}' is not a valid socket address",
                    self.http.listen_addr
                ));
            }
        } else {
            errors.push("listen_addr must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

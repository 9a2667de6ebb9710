//! Page fetching configuration

use serde::{Deserialize, Serialize};

use super::DEFAULT_USER_AGENT;

/// Page fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Maximum response body size (bytes)
    pub max_content_size: usize,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_content_size: 10 * 1024 * 1024, // 10 MB
        }
    }
}

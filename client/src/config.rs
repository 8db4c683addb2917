//! Transport client configuration.
//!
//! A `ClientConfig` is fixed when the client is built and never mutated
//! afterwards; every call made through one client shares it.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_BASE_PATH: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    base_path: String,
    timeout: Duration,
    content_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Config for a server at `base_url`, all other settings at their defaults.
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Path prefix shared by every resource path. An empty string disables it.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        self.base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Absolute URL for a resource path such as `/todos/5`.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}{}/{path}", self.base_url, self.base_path)
    }
}

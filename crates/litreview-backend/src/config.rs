//! Configuration for the literature review backend.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Per-attempt request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Retries after the initial attempt (6 attempts total).
    pub const MAX_RETRIES: u32 = 5;

    /// Wait before the first retry.
    pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Upper bound (exclusive) of the random jitter added to each wait.
    pub const MAX_JITTER: Duration = Duration::from_millis(500);

    /// Backoff growth after a 429 or 5xx response.
    pub const RATE_LIMIT_MULTIPLIER: f64 = 1.5;

    /// Backoff growth after a timed out attempt.
    pub const TIMEOUT_MULTIPLIER: f64 = 2.0;
}

/// Paper field sets for API requests.
pub mod fields {
    /// Fields requested from `/paper/search`.
    pub const SEARCH: &[&str] = &[
        "paperId",
        "url",
        "title",
        "abstract",
        "authors",
        "year",
        "isOpenAccess",
        "openAccessPdf",
    ];
}

/// Defaults applied to inbound search requests.
pub mod search {
    /// Papers returned when the request carries no `limit`.
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Fetch multiplier used when only papers with a PDF are wanted.
    ///
    /// Best effort: filtering can still leave fewer than `limit` papers.
    pub const PDF_FETCH_MULTIPLIER: u32 = 2;
}

/// Retry behaviour for upstream calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,

    /// Wait before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound (exclusive) of the jitter added to each wait.
    pub max_jitter: Duration,

    /// Backoff growth after a 429 or 5xx response.
    pub rate_limit_multiplier: f64,

    /// Backoff growth after a timeout.
    pub timeout_multiplier: f64,
}

impl RetryPolicy {
    /// Total attempts including the first one.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: api::MAX_RETRIES,
            initial_backoff: api::INITIAL_BACKOFF,
            max_jitter: api::MAX_JITTER,
            rate_limit_multiplier: api::RATE_LIMIT_MULTIPLIER,
            timeout_multiplier: api::TIMEOUT_MULTIPLIER,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Request timeout per attempt.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retry policy for `/paper/search`.
    pub retry: RetryPolicy,
}

impl Config {
    /// Create a new configuration with optional API key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            graph_api_url: api::GRAPH_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Create a test configuration pointing at a mock server.
    ///
    /// Backoff is shrunk to milliseconds and jitter disabled so retry tests
    /// finish quickly; the attempt count is unchanged.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            retry: RetryPolicy {
                initial_backoff: Duration::from_millis(1),
                max_jitter: Duration::ZERO,
                ..RetryPolicy::default()
            },
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `SEMANTIC_SCHOLAR_API_KEY` and `SEMANTIC_SCHOLAR_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns error if the API URL is not a valid absolute URL.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok().filter(|k| !k.is_empty());
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("SEMANTIC_SCHOLAR_API_URL") {
            config = config.with_graph_api_url(&url)?;
        }
        Ok(config)
    }

    /// Override the Graph API base URL.
    ///
    /// # Errors
    ///
    /// Returns error if `url` does not parse as an http(s) URL.
    pub fn with_graph_api_url(mut self, url: &str) -> anyhow::Result<Self> {
        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("unsupported scheme for API URL: {}", parsed.scheme());
        }
        self.graph_api_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.request_timeout, Duration::from_secs(25));
        assert_eq!(config.graph_api_url, api::GRAPH_API);
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 6);
        assert_eq!(policy.initial_backoff, Duration::from_secs(1));
        assert_eq!(policy.max_jitter, Duration::from_millis(500));
    }

    #[test]
    fn test_for_testing_keeps_attempt_count() {
        let config = Config::for_testing("http://localhost:1234");
        assert_eq!(config.graph_api_url, "http://localhost:1234/graph/v1");
        assert_eq!(config.retry.max_attempts(), 6);
        assert_eq!(config.retry.max_jitter, Duration::ZERO);
    }

    #[test]
    fn test_with_graph_api_url_trims_slash() {
        let config = Config::default().with_graph_api_url("http://mock:8080/graph/v1/").unwrap();
        assert_eq!(config.graph_api_url, "http://mock:8080/graph/v1");
    }

    #[test]
    fn test_with_graph_api_url_rejects_garbage() {
        assert!(Config::default().with_graph_api_url("not a url").is_err());
        assert!(Config::default().with_graph_api_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_search_fields() {
        assert!(fields::SEARCH.contains(&"openAccessPdf"));
        assert!(fields::SEARCH.contains(&"isOpenAccess"));
        assert_eq!(fields::SEARCH.len(), 8);
    }
}

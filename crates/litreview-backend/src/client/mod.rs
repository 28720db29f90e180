//! Semantic Scholar API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Bounded retry with jittered backoff on 429, 5xx and timeouts
//! - PDF link normalization of search results

mod retry;

use reqwest::{Client, StatusCode};

pub use retry::{RetryReason, RetryState, with_jitter};

use crate::config::{Config, RetryPolicy, fields};
use crate::error::{ClientError, ClientResult};
use crate::models::{PaperRecord, SearchResult};

/// Result of a search that did not hit a fatal upstream error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Upstream answered; records are in upstream order.
    Found(Vec<PaperRecord>),

    /// Upstream could not be reached or kept failing.
    Failed(SearchFailure),
}

/// Why a search gave up without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    /// Every allowed attempt hit a retryable condition.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last: RetryReason,
    },

    /// A non-retryable transport problem (connect, TLS, unreadable body).
    Transport(String),
}

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client.
    client: Client,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,

    /// Retry policy for searches.
    retry: RetryPolicy,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key,
            graph_api_url: config.graph_api_url,
            retry: config.retry,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for papers, retrying transient failures.
    ///
    /// Each returned record has its `pdf_url` derived from `openAccessPdf`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UpstreamStatus`] at once for 4xx responses
    /// other than 429, and [`ClientError::Http`] if the request cannot be
    /// built from the configured URL. Exhausted retries and transport failures are not
    /// errors; they come back as [`SearchOutcome::Failed`].
    pub async fn search_papers(&self, query: &str, limit: u32) -> ClientResult<SearchOutcome> {
        let url = format!("{}/paper/search", self.graph_api_url);
        let params = [
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("fields", fields::SEARCH.join(",")),
        ];

        let max_attempts = self.retry.max_attempts();
        let mut state = RetryState::new(&self.retry);

        loop {
            let attempt = state.attempt();
            tracing::info!(attempt, max_attempts, query, "Querying Semantic Scholar");

            let reason = match self.client.get(&url).query(&params).send().await {
                Ok(response) => match Self::read_response(response).await? {
                    Ok(records) => {
                        tracing::info!(attempt, results = records.len(), "Search succeeded");
                        return Ok(SearchOutcome::Found(records));
                    }
                    Err(AttemptFailure::Retry(reason)) => reason,
                    Err(AttemptFailure::Transport(message)) => {
                        tracing::error!(attempt, error = %message, "Unreadable search response");
                        return Ok(SearchOutcome::Failed(SearchFailure::Transport(message)));
                    }
                },
                Err(e) if e.is_timeout() => RetryReason::Timeout,
                Err(e) if e.is_builder() => {
                    tracing::error!(url = %url, error = %e, "Could not build search request");
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Search request failed");
                    return Ok(SearchOutcome::Failed(SearchFailure::Transport(e.to_string())));
                }
            };

            tracing::warn!(attempt, reason = %reason, "Search attempt failed");

            if state.is_last(&self.retry) {
                tracing::error!(
                    query,
                    attempts = attempt,
                    "Failed to retrieve papers after all attempts"
                );
                return Ok(SearchOutcome::Failed(SearchFailure::Exhausted {
                    attempts: attempt,
                    last: reason,
                }));
            }

            let wait = with_jitter(state.backoff(), self.retry.max_jitter);
            tracing::info!(wait_secs = wait.as_secs_f64(), "Waiting before retry");
            tokio::time::sleep(wait).await;

            state = state.advance(reason, &self.retry);
        }
    }

    /// Classify a response from one attempt.
    ///
    /// The outer `Result` carries fatal errors; the inner one separates
    /// decoded records from failures the retry loop handles.
    async fn read_response(
        response: reqwest::Response,
    ) -> ClientResult<Result<Vec<PaperRecord>, AttemptFailure>> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Err(AttemptFailure::Retry(RetryReason::RateLimited)));
        }
        if status.as_u16() >= 500 {
            return Ok(Err(AttemptFailure::Retry(RetryReason::ServerError(status.as_u16()))));
        }
        if status.is_client_error() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %text, "Non-retryable upstream status");
            return Err(ClientError::upstream_status(status.as_u16(), text));
        }

        match response.json::<SearchResult>().await {
            Ok(result) => Ok(Ok(result.into_records())),
            Err(e) if e.is_timeout() => Ok(Err(AttemptFailure::Retry(RetryReason::Timeout))),
            Err(e) => Ok(Err(AttemptFailure::Transport(e.to_string()))),
        }
    }
}

/// Non-fatal failure of a single attempt.
enum AttemptFailure {
    Retry(RetryReason),
    Transport(String),
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("graph_api_url", &self.graph_api_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}

//! Search request handling: fetch, filter and shape.

use std::sync::Arc;

use crate::client::{SearchFailure, SearchOutcome, SemanticScholarClient};
use crate::error::{ApiError, ApiResult};
use crate::models::{EssentialPaper, PaperRecord, SearchRequest};

/// Runs validated search requests against the upstream API.
#[derive(Debug, Clone)]
pub struct SearchHandler {
    client: Arc<SemanticScholarClient>,
}

impl SearchHandler {
    /// Create a handler sharing `client`.
    #[must_use]
    pub const fn new(client: Arc<SemanticScholarClient>) -> Self {
        Self { client }
    }

    /// Fetch papers for `request` and shape them for the response.
    pub async fn handle(&self, request: &SearchRequest) -> ApiResult<Vec<EssentialPaper>> {
        tracing::info!(
            query = %request.query,
            limit = request.limit,
            require_pdf = request.require_pdf,
            "Search request"
        );

        let records = match self.client.search_papers(&request.query, request.fetch_limit()).await {
            Ok(SearchOutcome::Found(records)) => records,
            Ok(SearchOutcome::Failed(failure)) => {
                match failure {
                    SearchFailure::Exhausted { attempts, last } => tracing::error!(
                        query = %request.query,
                        attempts,
                        last = %last,
                        "Upstream retries exhausted"
                    ),
                    SearchFailure::Transport(message) => tracing::error!(
                        query = %request.query,
                        error = %message,
                        "Upstream unreachable"
                    ),
                }
                return Err(ApiError::Unavailable);
            }
            Err(e) => {
                tracing::error!(query = %request.query, error = %e, "Unexpected search API error");
                return Err(ApiError::Upstream(e));
            }
        };

        let papers = shape_results(&records, request);
        tracing::info!(
            query = %request.query,
            returned = papers.len(),
            fetched = records.len(),
            "Returning papers after filtering"
        );
        Ok(papers)
    }
}

/// Filter records and reduce them to their essential fields.
///
/// Keeps upstream order, skips malformed records and (when `require_pdf`)
/// records without a PDF link, and stops at `request.limit` papers.
#[must_use]
pub fn shape_results(records: &[PaperRecord], request: &SearchRequest) -> Vec<EssentialPaper> {
    let limit = request.limit as usize;
    let mut papers = Vec::with_capacity(limit.min(records.len()));

    for record in records {
        if papers.len() >= limit {
            break;
        }

        let paper = match record {
            PaperRecord::Paper(paper) => paper,
            PaperRecord::Malformed { reason } => {
                tracing::error!(error = %reason, "Skipping paper that could not be processed");
                continue;
            }
        };

        if request.require_pdf && !paper.has_pdf() {
            continue;
        }

        papers.push(EssentialPaper::from(paper));
    }

    papers
}

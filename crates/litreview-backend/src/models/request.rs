//! Inbound search request and its validation.

use serde_json::Value;

use crate::config::search::{DEFAULT_LIMIT, PDF_FETCH_MULTIPLIER};
use crate::error::{ApiError, ApiResult};

/// URL query parameters accepted by `POST /search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// `"true"` (any case) restricts results to papers with a PDF link.
    pub require_pdf: Option<String>,
}

impl SearchParams {
    /// Read parameters from a raw query string.
    ///
    /// Never fails: unknown keys are ignored and a repeated key keeps its
    /// first value.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let require_pdf = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "require_pdf")
                .map(|(_, value)| value.into_owned())
        });
        Self { require_pdf }
    }

    /// Whether the PDF filter was requested.
    #[must_use]
    pub fn require_pdf(&self) -> bool {
        self.require_pdf.as_deref().is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search string, never empty.
    pub query: String,

    /// Maximum papers to return, always positive.
    pub limit: u32,

    /// Only return papers with a PDF link.
    pub require_pdf: bool,
}

impl SearchRequest {
    /// Build a request directly (no validation beyond the types).
    #[must_use]
    pub fn new(query: impl Into<String>, limit: u32, require_pdf: bool) -> Self {
        Self { query: query.into(), limit, require_pdf }
    }

    /// Validate a JSON body.
    ///
    /// The body must be an object with a non-empty string `query`; `limit`
    /// is optional and must be a positive integer when present.
    pub fn from_json(body: &Value, require_pdf: bool) -> ApiResult<Self> {
        let Value::Object(fields) = body else {
            return Err(ApiError::InvalidRequest);
        };

        let query = match fields.get("query") {
            Some(Value::String(q)) if !q.is_empty() => q.clone(),
            _ => return Err(ApiError::MissingQuery),
        };

        let limit = match fields.get("limit") {
            None => DEFAULT_LIMIT,
            Some(value) => parse_limit(value)?,
        };

        Ok(Self { query, limit, require_pdf })
    }

    /// Number of papers to ask the upstream API for.
    ///
    /// Inflated when filtering for PDFs to offset the papers the filter
    /// drops. The final response may still hold fewer than `limit` papers.
    #[must_use]
    pub const fn fetch_limit(&self) -> u32 {
        if self.require_pdf { self.limit.saturating_mul(PDF_FETCH_MULTIPLIER) } else { self.limit }
    }
}

fn parse_limit(value: &Value) -> ApiResult<u32> {
    value
        .as_u64()
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(ApiError::InvalidLimit)
}

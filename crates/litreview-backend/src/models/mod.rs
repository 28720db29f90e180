//! Data models for the search API.
//!
//! Upstream models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match API naming.

mod paper;
mod request;

pub use paper::{AuthorRef, EssentialPaper, OpenAccessPdf, Paper, PaperRecord, SearchResult};
pub use request::{SearchParams, SearchRequest};

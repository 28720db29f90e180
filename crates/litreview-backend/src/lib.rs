//! Literature Review Backend
//!
//! A small HTTP service that searches the Semantic Scholar Graph API and
//! returns the essential fields of each paper.
//!
//! # Features
//!
//! - **Bounded retry**: 6 attempts with jittered backoff on 429, 5xx and timeouts
//! - **PDF filtering**: `?require_pdf=true` keeps only papers with an open access PDF
//! - **Resilient shaping**: a malformed upstream record is skipped, not fatal
//!
//! # Example
//!
//! ```no_run
//! use litreview_backend::{client::SemanticScholarClient, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SemanticScholarClient::new(config)?;
//!
//!     let outcome = client.search_papers("explainable ai techniques survey", 3).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod models;
pub mod server;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use error::{ApiError, ClientError};

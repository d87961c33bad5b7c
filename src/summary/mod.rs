//! Note summaries: the generator seam and the dialog that drives it.

mod keyword;
mod requester;

pub use keyword::{summarize_text, KeywordSummarizer};
pub use requester::{SummaryRequester, SummaryTicket};

use async_trait::async_trait;
use thiserror::Error;

/// A summary generator rejected the request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Summary generation failed: {0}")]
pub struct SummaryError(pub String);

/// Produces a short summary of a note's text.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError>;
}

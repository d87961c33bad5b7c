use serde::Serialize;

/// Message shown whenever the summary generator fails, whatever the cause.
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to generate summary. Please try again.";

/// Where a summary request currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SummaryStatus {
    Pending,
    Succeeded { summary: String },
    Failed { message: String },
}

/// The one summary dialog slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRequest {
    /// Note text captured when the summary was requested.
    pub source_content: String,
    #[serde(flatten)]
    pub status: SummaryStatus,
}

impl SummaryRequest {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, SummaryStatus::Pending)
    }

    /// The generated summary, if the request succeeded.
    pub fn summary(&self) -> Option<&str> {
        match &self.status {
            SummaryStatus::Succeeded { summary } => Some(summary),
            _ => None,
        }
    }
}

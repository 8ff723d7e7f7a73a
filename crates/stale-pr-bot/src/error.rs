//! Run errors
//!
//! Every variant carries the summary of what was done before the run
//! stopped, so the scheduler still gets partial metrics.

use crate::summary::RunSummary;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to determine the login the bot comments as")]
    Identity {
        summary: RunSummary,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to list open pull requests")]
    ListPulls {
        summary: RunSummary,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to process PR #{pr}")]
    Pr {
        pr: u64,
        summary: RunSummary,
        #[source]
        source: anyhow::Error,
    },

    #[error("{} pull request(s) failed: {failed:?}", failed.len())]
    PartialFailure {
        failed: Vec<u64>,
        summary: RunSummary,
    },
}

impl RunError {
    /// Metrics accumulated up to the failure
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunError::Identity { summary, .. }
            | RunError::ListPulls { summary, .. }
            | RunError::Pr { summary, .. }
            | RunError::PartialFailure { summary, .. } => summary,
        }
    }
}

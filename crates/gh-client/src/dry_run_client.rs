//! Dry-run GitHub API client (decorator pattern)
//!
//! Wraps any `GitHubClient` implementation and suppresses every mutating
//! call. Reads pass through to the inner client unchanged; writes are
//! logged and recorded instead of executed, so callers cannot tell the
//! difference and keep their bookkeeping identical to a live run.

use crate::client::GitHubClient;
use crate::types::{CheckRun, Commit, CommitStatus, IssueComment, PullRequest, Review};
use async_trait::async_trait;
use log::info;
use std::sync::{Arc, Mutex};

/// A mutating call that was suppressed by [`DryRunClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressedCall {
    /// A comment that would have been posted
    CreateComment { pr_number: u64, body: String },
    /// Labels that would have been added
    AddLabels { pr_number: u64, labels: Vec<String> },
    /// A close that would have been issued
    ClosePullRequest { pr_number: u64 },
}

/// Dry-run GitHub API client using the decorator pattern
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{DryRunClient, OctocrabClient};
///
/// let octocrab = Arc::new(octocrab::Octocrab::builder().build().unwrap());
/// let client = DryRunClient::new(OctocrabClient::new(octocrab));
///
/// // Reads hit the API, writes are only logged
/// client.close_pull_request("owner", "repo", 42).await?;
/// assert_eq!(client.suppressed().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DryRunClient<C: GitHubClient> {
    inner: C,
    suppressed: Arc<Mutex<Vec<SuppressedCall>>>,
}

impl<C: GitHubClient> DryRunClient<C> {
    /// Wrap an inner client
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            suppressed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All mutating calls suppressed so far, in call order
    pub fn suppressed(&self) -> Vec<SuppressedCall> {
        self.suppressed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: SuppressedCall) {
        self.suppressed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

#[async_trait]
impl<C: GitHubClient> GitHubClient for DryRunClient<C> {
    async fn fetch_current_user_login(&self) -> anyhow::Result<String> {
        self.inner.fetch_current_user_login().await
    }

    async fn fetch_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        self.inner.fetch_open_pull_requests(owner, repo).await
    }

    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        self.inner.fetch_pull_request(owner, repo, pr_number).await
    }

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>> {
        self.inner.fetch_check_runs(owner, repo, commit_sha).await
    }

    async fn fetch_commit_statuses(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CommitStatus>> {
        self.inner
            .fetch_commit_statuses(owner, repo, commit_sha)
            .await
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        self.inner.fetch_reviews(owner, repo, pr_number).await
    }

    async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Commit>> {
        self.inner.fetch_commits(owner, repo, pr_number).await
    }

    async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<IssueComment>> {
        self.inner.fetch_comments(owner, repo, pr_number).await
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<()> {
        info!(
            "[dry-run] would comment on {}/{}#{}: {:?}",
            owner, repo, pr_number, body
        );
        self.record(SuppressedCall::CreateComment {
            pr_number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        info!(
            "[dry-run] would add labels {:?} to {}/{}#{}",
            labels, owner, repo, pr_number
        );
        self.record(SuppressedCall::AddLabels {
            pr_number,
            labels: labels.to_vec(),
        });
        Ok(())
    }

    async fn close_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<()> {
        info!("[dry-run] would close {}/{}#{}", owner, repo, pr_number);
        self.record(SuppressedCall::ClosePullRequest { pr_number });
        Ok(())
    }
}

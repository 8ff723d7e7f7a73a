//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy. It covers exactly the reads the stale
//! PR bot needs to reconstruct a PR's state, and the three writes it
//! may perform.

use crate::types::{CheckRun, Commit, CommitStatus, IssueComment, PullRequest, Review};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Implementations can be direct (hitting the API) or decorated
/// with dry-run behavior, recording, etc.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{GitHubClient, PullRequest};
///
/// async fn list_prs(client: &dyn GitHubClient) -> anyhow::Result<Vec<PullRequest>> {
///     client.fetch_open_pull_requests("rust-lang", "rust").await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    // === Reads ===

    /// Login of the account the client is authenticated as
    ///
    /// This is the author of every comment the client posts.
    async fn fetch_current_user_login(&self) -> anyhow::Result<String>;

    /// Fetch all open pull requests for a repository, oldest first
    ///
    /// Follows pagination until the last page. The `mergeable` field is
    /// never populated here; use [`GitHubClient::fetch_pull_request`].
    async fn fetch_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>>;

    /// Fetch a single pull request by number
    ///
    /// This returns full PR details including the mergeability flag,
    /// which is not available in the list endpoint.
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest>;

    /// Fetch CI check runs for a specific commit
    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>>;

    /// Fetch every commit status reported for a commit
    ///
    /// This uses the legacy Status API which some CI systems still use
    /// (as opposed to the newer Checks API).
    async fn fetch_commit_statuses(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CommitStatus>>;

    /// Fetch all reviews on a pull request
    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>>;

    /// Fetch the commits of a pull request in chronological order
    async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Commit>>;

    /// Fetch the conversation comments of a pull request, oldest first
    async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<IssueComment>>;

    // === Writes ===

    /// Post a conversation comment on a pull request
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<()>;

    /// Add labels to a pull request
    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()>;

    /// Close a pull request without merging
    async fn close_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<()>;
}

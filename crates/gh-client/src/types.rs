//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the staleness domain model
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open pull request from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// PR title
    pub title: String,

    /// HEAD commit SHA
    pub head_sha: String,

    /// Label names attached to the PR
    pub labels: Vec<String>,

    /// Whether the PR is mergeable (null if not yet computed by GitHub).
    ///
    /// Only populated by the single-PR endpoint; the list endpoint
    /// always leaves this unset.
    pub mergeable: Option<bool>,

    /// When the PR was opened
    pub created_at: DateTime<Utc>,
}

/// A CI check run from the GitHub Checks API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check run ID
    pub id: u64,

    /// Name of the check (e.g., "build", "test")
    pub name: String,

    /// Conclusion (unset until the run has completed)
    pub conclusion: Option<CheckConclusion>,

    /// When the check started
    pub started_at: Option<DateTime<Utc>>,

    /// When the check completed
    pub completed_at: Option<DateTime<Utc>>,
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Check passed
    Success,
    /// Check failed
    Failure,
    /// Check was neutral (neither success nor failure)
    Neutral,
    /// Check was cancelled
    Cancelled,
    /// Check was skipped
    Skipped,
    /// Check timed out
    TimedOut,
    /// Action is required from the user
    ActionRequired,
    /// Check is stale (superseded by newer run)
    Stale,
}

/// A single commit status (from the Status API, not the Checks API)
///
/// The list endpoint returns every status ever reported for a commit,
/// newest first, so one context may appear several times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Status context (e.g., "ci/circleci")
    pub context: String,

    /// Reported state
    pub state: CheckState,

    /// When the status was created
    pub created_at: DateTime<Utc>,

    /// When the status was last updated
    pub updated_at: DateTime<Utc>,
}

/// State of a commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// The check passed
    Success,
    /// The check is pending
    Pending,
    /// The check failed
    Failure,
    /// The check errored
    Error,
}

/// Relationship between a comment/review author and the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorAssociation {
    /// Owner of the repository
    Owner,
    /// Member of the owning organization
    Member,
    /// Invited collaborator
    Collaborator,
    /// Has previously committed to the repository
    Contributor,
    /// First contribution to this repository
    FirstTimeContributor,
    /// First contribution to GitHub
    FirstTimer,
    /// Placeholder for an imported user
    Mannequin,
    /// No association
    None,
    /// Anything GitHub adds later
    #[serde(other)]
    Unknown,
}

/// Review state as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// The reviewer approved the PR
    Approved,
    /// The reviewer requested changes
    ChangesRequested,
    /// Comment-only review
    Commented,
    /// The review was dismissed
    Dismissed,
    /// Review not yet submitted
    Pending,
    /// Anything GitHub adds later
    #[serde(other)]
    Unknown,
}

/// A pull request review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Review ID
    pub id: u64,
    /// Reviewer's GitHub username
    pub author: String,
    /// Reviewer's association with the repository
    pub author_association: AuthorAssociation,
    /// Review state
    pub state: ReviewState,
    /// When the review was submitted (unset for pending reviews)
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A commit on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Commit SHA
    pub sha: String,
    /// Committer date, if GitHub reported one
    pub committed_at: Option<DateTime<Utc>>,
}

/// A conversation comment on a pull request (issue comment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// GitHub comment ID
    pub id: u64,
    /// Author's GitHub username
    pub author: String,
    /// Author's association with the repository
    pub author_association: AuthorAssociation,
    /// Comment body text
    pub body: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

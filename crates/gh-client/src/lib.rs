//! GitHub API client for the stale PR bot
//!
//! This crate provides a trait-based GitHub API client covering the reads
//! needed to reconstruct a pull request's state and the few writes the bot
//! performs. The design follows the decorator pattern, allowing dry-run
//! behavior to be composed with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_open_pull_requests() / reviews / ...    │
//! │  - create_comment() / add_labels() / close()     │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ DryRunClient        │
//! │ (direct API)    │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{connect, DryRunClient, GitHubClient, TokenResolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let direct = connect("github.com", &TokenResolver::new()).await?;
//!
//! // Reads hit the API, writes are logged and recorded only
//! let dry = DryRunClient::new(direct);
//! let prs = dry.fetch_open_pull_requests("owner", "repo").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod dry_run_client;
pub mod octocrab_client;
pub mod token;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::GitHubClient;
pub use dry_run_client::{DryRunClient, SuppressedCall};
pub use octocrab_client::OctocrabClient;
pub use token::{connect, TokenResolver};
pub use types::{
    AuthorAssociation, CheckConclusion, CheckRun, CheckState, Commit, CommitStatus, IssueComment,
    PullRequest, Review, ReviewState,
};

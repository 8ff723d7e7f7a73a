//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! This client makes real API calls; every read is fetched fresh.

use crate::client::GitHubClient;
use crate::types::{
    AuthorAssociation, CheckConclusion, CheckRun, CheckState, Commit, CommitStatus, IssueComment,
    PullRequest, Review, ReviewState,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Page size used for every paginated endpoint (GitHub's maximum)
const PER_PAGE: u8 = 100;

/// The PR commits endpoint never returns more than this many commits
const MAX_PR_COMMITS: usize = 250;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// GET every page of a list endpoint that returns a bare JSON array
    async fn get_all_pages<T: DeserializeOwned>(&self, route: &str) -> anyhow::Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<T> = self.octocrab.get(route, Some(&params)).await?;
            let is_last_page = batch.len() < PER_PAGE as usize;
            items.extend(batch);

            if is_last_page {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_current_user_login(&self) -> anyhow::Result<String> {
        debug!("Fetching authenticated user");

        let user = self
            .octocrab
            .current()
            .user()
            .await
            .context("Failed to fetch the authenticated user")?;
        Ok(user.login)
    }

    async fn fetch_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Fetching open PRs for {}/{}", owner, repo);

        let mut prs = Vec::new();
        let mut page_num = 1u32;

        loop {
            let page = self
                .octocrab
                .pulls(owner, repo)
                .list()
                .state(octocrab::params::State::Open)
                .sort(octocrab::params::pulls::Sort::Created)
                .direction(octocrab::params::Direction::Ascending)
                .per_page(PER_PAGE)
                .page(page_num)
                .send()
                .await?;

            let is_last_page = page.items.len() < PER_PAGE as usize;
            prs.extend(page.items.iter().map(convert_pull_request));

            if is_last_page {
                break;
            }
            page_num += 1;
        }

        // The API already sorts by creation date; keep it stable regardless
        prs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.number.cmp(&b.number)));

        debug!("Fetched {} open PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR #{} for {}/{}", pr_number, owner, repo);

        let pr = self.octocrab.pulls(owner, repo).get(pr_number).await?;
        Ok(convert_pull_request(&pr))
    }

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>> {
        debug!(
            "Fetching check runs for {}/{} @ {}",
            owner, repo, commit_sha
        );

        // The check-runs endpoint wraps its array, so it can't share get_all_pages
        let route = format!("/repos/{}/{}/commits/{}/check-runs", owner, repo, commit_sha);
        let mut runs = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let batch: RawCheckRuns = self.octocrab.get(&route, Some(&params)).await?;
            let is_last_page = batch.check_runs.len() < PER_PAGE as usize;
            runs.extend(batch.check_runs.into_iter().map(convert_check_run));

            if is_last_page {
                break;
            }
            page += 1;
        }

        Ok(runs)
    }

    async fn fetch_commit_statuses(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CommitStatus>> {
        debug!(
            "Fetching commit statuses for {}/{} @ {}",
            owner, repo, commit_sha
        );

        // Use raw GET request since octocrab's Reference type doesn't support commit SHAs
        let route = format!("/repos/{}/{}/commits/{}/statuses", owner, repo, commit_sha);
        let statuses: Vec<RawStatus> = self.get_all_pages(&route).await?;

        Ok(statuses
            .into_iter()
            .map(|s| CommitStatus {
                context: s.context.unwrap_or_else(|| "unknown".to_string()),
                state: s.state,
                created_at: s.created_at,
                updated_at: s.updated_at,
            })
            .collect())
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        debug!("Fetching reviews for {}/{}#{}", owner, repo, pr_number);

        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let reviews: Vec<RawReview> = self.get_all_pages(&route).await?;

        Ok(reviews
            .into_iter()
            .map(|r| Review {
                id: r.id,
                author: login_or_unknown(r.user),
                author_association: r.author_association.unwrap_or(AuthorAssociation::None),
                state: r.state,
                submitted_at: r.submitted_at,
            })
            .collect())
    }

    async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Commit>> {
        debug!("Fetching commits for {}/{}#{}", owner, repo, pr_number);

        let route = format!("/repos/{}/{}/pulls/{}/commits", owner, repo, pr_number);
        let commits: Vec<RawCommit> = self.get_all_pages(&route).await?;
        if commits_truncated(commits.len()) {
            warn!(
                "{}/{}#{} has at least {} commits; GitHub lists no more, so the last commit time may be too old",
                owner, repo, pr_number, MAX_PR_COMMITS
            );
        }

        Ok(commits
            .into_iter()
            .map(|c| Commit {
                committed_at: c
                    .commit
                    .committer
                    .and_then(|a| a.date)
                    .or_else(|| c.commit.author.and_then(|a| a.date)),
                sha: c.sha,
            })
            .collect())
    }

    async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<IssueComment>> {
        debug!("Fetching comments for {}/{}#{}", owner, repo, pr_number);

        let route = format!("/repos/{}/{}/issues/{}/comments", owner, repo, pr_number);
        let comments: Vec<RawComment> = self.get_all_pages(&route).await?;

        Ok(comments
            .into_iter()
            .map(|c| IssueComment {
                id: c.id,
                author: login_or_unknown(c.user),
                author_association: c.author_association.unwrap_or(AuthorAssociation::None),
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect())
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<()> {
        debug!("Commenting on {}/{}#{}", owner, repo, pr_number);

        self.octocrab
            .issues(owner, repo)
            .create_comment(pr_number, body)
            .await
            .with_context(|| format!("Failed to comment on PR #{}", pr_number))?;
        Ok(())
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        debug!(
            "Adding labels {:?} to {}/{}#{}",
            labels, owner, repo, pr_number
        );

        self.octocrab
            .issues(owner, repo)
            .add_labels(pr_number, labels)
            .await
            .with_context(|| format!("Failed to label PR #{}", pr_number))?;
        Ok(())
    }

    async fn close_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<()> {
        debug!("Closing {}/{}#{}", owner, repo, pr_number);

        self.octocrab
            .issues(owner, repo)
            .update(pr_number)
            .state(octocrab::models::IssueState::Closed)
            .send()
            .await
            .with_context(|| format!("Failed to close PR #{}", pr_number))?;
        Ok(())
    }
}

// === Wire formats for endpoints read through raw GET requests ===

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawCheckRuns {
    check_runs: Vec<RawCheckRun>,
}

#[derive(Debug, Deserialize)]
struct RawCheckRun {
    id: u64,
    name: String,
    conclusion: Option<String>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    context: Option<String>,
    state: CheckState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    id: u64,
    user: Option<RawUser>,
    author_association: Option<AuthorAssociation>,
    state: ReviewState,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    author: Option<RawGitActor>,
    committer: Option<RawGitActor>,
}

#[derive(Debug, Deserialize)]
struct RawGitActor {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: u64,
    user: Option<RawUser>,
    author_association: Option<AuthorAssociation>,
    body: Option<String>,
    created_at: DateTime<Utc>,
}

fn login_or_unknown(user: Option<RawUser>) -> String {
    user.map(|u| u.login)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        head_sha: pr.head.sha.clone(),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
        mergeable: pr.mergeable,
        created_at: pr.created_at.unwrap_or_else(Utc::now),
    }
}

fn convert_check_run(run: RawCheckRun) -> CheckRun {
    CheckRun {
        id: run.id,
        name: run.name,
        conclusion: run.conclusion.as_deref().map(convert_conclusion_string),
        started_at: run.started_at,
        completed_at: run.completed_at,
    }
}

/// Whether a PR commit listing hit the endpoint's hard cap
fn commits_truncated(count: usize) -> bool {
    count >= MAX_PR_COMMITS
}

/// Convert conclusion string from GitHub API to our enum
fn convert_conclusion_string(conclusion: &str) -> CheckConclusion {
    match conclusion.to_lowercase().as_str() {
        "success" => CheckConclusion::Success,
        "failure" => CheckConclusion::Failure,
        "neutral" => CheckConclusion::Neutral,
        "cancelled" => CheckConclusion::Cancelled,
        "skipped" => CheckConclusion::Skipped,
        "timed_out" => CheckConclusion::TimedOut,
        "action_required" => CheckConclusion::ActionRequired,
        "stale" => CheckConclusion::Stale,
        _ => CheckConclusion::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_conclusion_string() {
        assert_eq!(convert_conclusion_string("success"), CheckConclusion::Success);
        assert_eq!(convert_conclusion_string("FAILURE"), CheckConclusion::Failure);
        assert_eq!(convert_conclusion_string("timed_out"), CheckConclusion::TimedOut);
        assert_eq!(
            convert_conclusion_string("action_required"),
            CheckConclusion::ActionRequired
        );
        assert_eq!(convert_conclusion_string("unknown"), CheckConclusion::Neutral);
    }

    #[test]
    fn test_commits_truncated_at_endpoint_cap() {
        assert!(!commits_truncated(0));
        assert!(!commits_truncated(249));
        assert!(commits_truncated(250));
    }

    #[test]
    fn test_raw_check_run_ignores_status() {
        let json = r#"{
            "id": 3,
            "name": "build",
            "status": "completed",
            "conclusion": "failure",
            "started_at": "2024-01-01T00:00:00Z",
            "completed_at": "2024-01-01T00:10:00Z"
        }"#;
        let run = convert_check_run(serde_json::from_str(json).unwrap());
        assert_eq!(run.name, "build");
        assert_eq!(run.conclusion, Some(CheckConclusion::Failure));
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn test_raw_commit_prefers_committer_date() {
        let json = r#"{
            "sha": "abc123",
            "commit": {
                "author": { "date": "2024-01-01T00:00:00Z" },
                "committer": { "date": "2024-01-02T00:00:00Z" }
            }
        }"#;
        let raw: RawCommit = serde_json::from_str(json).unwrap();
        let committed_at = raw
            .commit
            .committer
            .and_then(|a| a.date)
            .or_else(|| raw.commit.author.and_then(|a| a.date));
        assert_eq!(
            committed_at.unwrap().to_rfc3339(),
            "2024-01-02T00:00:00+00:00"
        );
    }

    #[test]
    fn test_raw_review_without_submission_time() {
        let json = r#"{
            "id": 7,
            "user": { "login": "octocat" },
            "author_association": "OWNER",
            "state": "PENDING",
            "submitted_at": null
        }"#;
        let raw: RawReview = serde_json::from_str(json).unwrap();
        assert_eq!(raw.state, ReviewState::Pending);
        assert_eq!(raw.author_association, Some(AuthorAssociation::Owner));
        assert!(raw.submitted_at.is_none());
        assert_eq!(login_or_unknown(raw.user), "octocat");
    }
}

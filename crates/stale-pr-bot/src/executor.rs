//! Carrying out decided actions against GitHub
//!
//! The executor does not know whether it is live or dry: dry runs hand it
//! a `DryRunClient`, so the calls and the logging are the same either way.

use anyhow::Context;
use gh_client::{GitHubClient, PullRequest};
use log::info;
use stale_pr_config::RepoRef;
use stale_pr_core::{Messages, StaleVerdict};

pub struct Executor<'a> {
    client: &'a dyn GitHubClient,
    repo: &'a RepoRef,
    messages: &'a Messages,
    close_label: Option<&'a str>,
}

impl<'a> Executor<'a> {
    pub fn new(
        client: &'a dyn GitHubClient,
        repo: &'a RepoRef,
        messages: &'a Messages,
        close_label: Option<&'a str>,
    ) -> Self {
        Self {
            client,
            repo,
            messages,
            close_label,
        }
    }

    /// Post the stale warning for `verdict`
    pub async fn warn(&self, pr: &PullRequest, verdict: &StaleVerdict) -> anyhow::Result<()> {
        info!(
            "Warning PR #{} ({}): {} since {}",
            pr.number, pr.title, verdict.reason, verdict.since
        );
        self.comment(pr, &self.messages.warning(verdict.reason))
            .await
    }

    /// Post the closing comment, label the PR and close it
    pub async fn close(&self, pr: &PullRequest) -> anyhow::Result<()> {
        info!("Closing PR #{} ({})", pr.number, pr.title);
        self.comment(pr, &self.messages.closing()).await?;

        if let Some(label) = self.close_label {
            self.client
                .add_labels(
                    &self.repo.owner,
                    &self.repo.name,
                    pr.number,
                    &[label.to_string()],
                )
                .await
                .with_context(|| format!("labelling #{} with '{}'", pr.number, label))?;
        }

        self.client
            .close_pull_request(&self.repo.owner, &self.repo.name, pr.number)
            .await
            .with_context(|| format!("closing #{}", pr.number))
    }

    /// Post the early merge-conflict heads-up
    pub async fn warn_merge_conflict(&self, pr: &PullRequest) -> anyhow::Result<()> {
        info!("Merge conflict heads-up on PR #{} ({})", pr.number, pr.title);
        self.comment(pr, &self.messages.conflict_warning()).await
    }

    async fn comment(&self, pr: &PullRequest, body: &str) -> anyhow::Result<()> {
        self.client
            .create_comment(&self.repo.owner, &self.repo.name, pr.number, body)
            .await
            .with_context(|| format!("commenting on #{}", pr.number))
    }
}

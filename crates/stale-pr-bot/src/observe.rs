//! Fetching everything the core needs to know about one PR

use anyhow::Context;
use gh_client::{GitHubClient, PullRequest};
use log::debug;
use stale_pr_config::RepoRef;
use stale_pr_core::PrObservation;

/// Fetch a fresh observation bundle for `pr`
pub async fn observe(
    client: &dyn GitHubClient,
    repo: &RepoRef,
    pr: &PullRequest,
) -> anyhow::Result<PrObservation> {
    let (owner, name, number) = (repo.owner.as_str(), repo.name.as_str(), pr.number);

    let check_runs = client
        .fetch_check_runs(owner, name, &pr.head_sha)
        .await
        .with_context(|| format!("fetching check runs for #{}", number))?;
    let statuses = client
        .fetch_commit_statuses(owner, name, &pr.head_sha)
        .await
        .with_context(|| format!("fetching commit statuses for #{}", number))?;
    let reviews = client
        .fetch_reviews(owner, name, number)
        .await
        .with_context(|| format!("fetching reviews for #{}", number))?;
    let commits = client
        .fetch_commits(owner, name, number)
        .await
        .with_context(|| format!("fetching commits for #{}", number))?;
    let comments = client
        .fetch_comments(owner, name, number)
        .await
        .with_context(|| format!("fetching comments for #{}", number))?;

    // The list endpoint never carries mergeability
    let mergeable = client
        .fetch_pull_request(owner, name, number)
        .await
        .with_context(|| format!("fetching mergeability for #{}", number))?
        .mergeable;

    debug!(
        "#{}: {} check runs, {} statuses, {} reviews, {} commits, {} comments, mergeable {:?}",
        number,
        check_runs.len(),
        statuses.len(),
        reviews.len(),
        commits.len(),
        comments.len(),
        mergeable
    );

    Ok(PrObservation {
        check_runs,
        statuses,
        reviews,
        commits,
        comments,
        mergeable,
    })
}

//! The run loop
//!
//! One pass over every open PR of the configured repository, oldest first,
//! one PR at a time. Nothing crosses PR boundaries except the metrics.

use crate::error::RunError;
use crate::executor::Executor;
use crate::observe::observe;
use crate::summary::{Metrics, RunSummary};
use chrono::{DateTime, Utc};
use gh_client::{GitHubClient, PullRequest};
use log::{debug, error, info};
use stale_pr_config::ResolvedConfig;
use stale_pr_core::facts::skip_label;
use stale_pr_core::{classify, resolve, Action, Classification, PrFacts};

/// Evaluate and act on every open PR
///
/// Stops at the first failing PR unless `continue_on_error` is set, in
/// which case the failures are collected and reported once at the end.
/// Either way the error carries the metrics gathered so far.
pub async fn run(
    client: &dyn GitHubClient,
    config: &ResolvedConfig,
    now: DateTime<Utc>,
) -> Result<RunSummary, RunError> {
    let repo = &config.repository;
    let mut metrics = Metrics::default();

    let bot_login = match bot_login(client, config).await {
        Ok(login) => login,
        Err(source) => {
            return Err(RunError::Identity {
                summary: metrics.summary(config.dry_run),
                source,
            })
        }
    };
    debug!("Recognising bot notices posted by {}", bot_login);

    let mut pulls = match client.fetch_open_pull_requests(&repo.owner, &repo.name).await {
        Ok(pulls) => pulls,
        Err(source) => {
            return Err(RunError::ListPulls {
                summary: metrics.summary(config.dry_run),
                source,
            })
        }
    };
    pulls.sort_by_key(|pr| (pr.created_at, pr.number));
    info!("Found {} open pull requests in {}", pulls.len(), repo);

    let executor = Executor::new(
        client,
        repo,
        &config.messages,
        config.close_label.as_deref(),
    );
    let mut failed = Vec::new();

    for pr in &pulls {
        if let Some(label) = skip_label(&pr.labels, &config.skip_labels) {
            info!("Skipping PR #{}: labelled '{}'", pr.number, label);
            metrics.record_skipped();
            continue;
        }

        match process_pr(client, config, &executor, &bot_login, pr, now).await {
            Ok((classification, action)) => metrics.record_processed(&classification, action),
            Err(source) => {
                metrics.record_failed();
                if !config.continue_on_error {
                    return Err(RunError::Pr {
                        pr: pr.number,
                        summary: metrics.summary(config.dry_run),
                        source,
                    });
                }
                error!("PR #{} failed: {:#}", pr.number, source);
                failed.push(pr.number);
            }
        }
    }

    let summary = metrics.summary(config.dry_run);
    if failed.is_empty() {
        Ok(summary)
    } else {
        Err(RunError::PartialFailure { failed, summary })
    }
}

/// The configured login, or the one the token belongs to
async fn bot_login(client: &dyn GitHubClient, config: &ResolvedConfig) -> anyhow::Result<String> {
    match &config.bot_login {
        Some(login) => Ok(login.clone()),
        None => client.fetch_current_user_login().await,
    }
}

async fn process_pr(
    client: &dyn GitHubClient,
    config: &ResolvedConfig,
    executor: &Executor<'_>,
    bot_login: &str,
    pr: &PullRequest,
    now: DateTime<Utc>,
) -> anyhow::Result<(Classification, Action)> {
    let observation = observe(client, &config.repository, pr).await?;
    let facts = PrFacts::extract(
        &observation,
        &config.members,
        config.important_checks.as_ref(),
        bot_login,
    );
    let classification = classify(&facts, &config.staleness, now);

    if classification == Classification::WarnMergeConflict {
        executor.warn_merge_conflict(pr).await?;
    }

    let action = resolve(
        classification.verdict(),
        &facts.warnings,
        facts.latest_member_activity,
        config.response_days,
        now,
    );
    match &classification {
        Classification::Stale(verdict) => info!(
            "PR #{} is stale ({} since {}), action: {}",
            pr.number, verdict.reason, verdict.since, action
        ),
        _ => debug!("PR #{}: {:?}, action: {}", pr.number, classification, action),
    }

    match (action, classification.verdict()) {
        (Action::Warn, Some(verdict)) => executor.warn(pr, verdict).await?,
        (Action::Close, _) => executor.close(pr).await?,
        _ => {}
    }

    Ok((classification, action))
}

//! Fact extraction
//!
//! Pure functions turning the raw per-PR observations fetched from GitHub
//! into the normalized facts the classifier and resolver work on.

use crate::marker::Marker;
use chrono::{DateTime, Utc};
use gh_client::{
    AuthorAssociation, CheckConclusion, CheckRun, CheckState, Commit, CommitStatus, IssueComment,
    Review, ReviewState,
};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Author associations whose reviews and comments count as authoritative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPolicy {
    associations: HashSet<AuthorAssociation>,
}

impl MemberPolicy {
    /// Build a policy from the associations that count as "member"
    pub fn new(associations: impl IntoIterator<Item = AuthorAssociation>) -> Self {
        Self {
            associations: associations.into_iter().collect(),
        }
    }

    /// Whether an author with this association is a member
    pub fn is_member(&self, association: AuthorAssociation) -> bool {
        self.associations.contains(&association)
    }
}

impl Default for MemberPolicy {
    fn default() -> Self {
        Self::new([
            AuthorAssociation::Owner,
            AuthorAssociation::Member,
            AuthorAssociation::Collaborator,
        ])
    }
}

/// Everything fetched for one PR in one run
///
/// Built fresh every run and never cached.
#[derive(Debug, Clone, Default)]
pub struct PrObservation {
    pub check_runs: Vec<CheckRun>,
    pub statuses: Vec<CommitStatus>,
    pub reviews: Vec<Review>,
    /// Commits in chronological order
    pub commits: Vec<Commit>,
    pub comments: Vec<IssueComment>,
    /// GitHub's mergeability flag: `Some(false)` means conflicting
    pub mergeable: Option<bool>,
}

/// A check or status whose most recent result is a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCheck {
    /// Check-run name or status context
    pub name: String,
    /// When that most recent result was produced
    pub when: DateTime<Utc>,
}

/// Kind of authoritative review on a PR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewKind {
    Approved,
    ChangesRequested,
}

/// The authoritative member review state of a PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewFact {
    pub kind: ReviewKind,
    pub when: DateTime<Utc>,
}

/// Timestamp of the newest bot comment per marker kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningRecord {
    pub stale_pr: Option<DateTime<Utc>>,
    pub merge_conflict: Option<DateTime<Utc>>,
}

impl WarningRecord {
    /// Scan a comment log newest-first, keeping the first hit per marker kind
    ///
    /// Only comments posted as `bot_login` are considered; a marker pasted
    /// by anybody else is ignored. The result depends only on the set of
    /// comments, not on the order they are passed in.
    pub fn scan(comments: &[IssueComment], bot_login: &str) -> Self {
        let mut newest_first: Vec<&IssueComment> = comments
            .iter()
            .filter(|comment| is_authored_by(comment, bot_login))
            .collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let mut record = WarningRecord::default();
        for comment in newest_first {
            for marker in Marker::find_in(&comment.body) {
                let slot = record.slot_mut(marker);
                if slot.is_none() {
                    *slot = Some(comment.created_at);
                }
            }
            if record.stale_pr.is_some() && record.merge_conflict.is_some() {
                break;
            }
        }
        record
    }

    /// Newest timestamp recorded for a marker kind
    pub fn get(&self, marker: Marker) -> Option<DateTime<Utc>> {
        match marker {
            Marker::StalePr => self.stale_pr,
            Marker::MergeConflict => self.merge_conflict,
        }
    }

    fn slot_mut(&mut self, marker: Marker) -> &mut Option<DateTime<Utc>> {
        match marker {
            Marker::StalePr => &mut self.stale_pr,
            Marker::MergeConflict => &mut self.merge_conflict,
        }
    }
}

/// Normalized facts about one PR, ready for classification
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrFacts {
    pub review: Option<ReviewFact>,
    pub last_commit: Option<DateTime<Utc>>,
    /// Most recent failure among the checks that count
    pub build_failure: Option<DateTime<Utc>>,
    pub merge_conflict: bool,
    pub warnings: WarningRecord,
    /// Newest member comment or review, bot notices excluded
    pub latest_member_activity: Option<DateTime<Utc>>,
}

impl PrFacts {
    /// Extract all facts from one observation bundle
    ///
    /// `bot_login` is the account the bot comments as.
    pub fn extract(
        observation: &PrObservation,
        members: &MemberPolicy,
        important_checks: Option<&Regex>,
        bot_login: &str,
    ) -> Self {
        let failed = failing_checks(&observation.check_runs, &observation.statuses);
        let facts = Self {
            review: review_state(&observation.reviews, members),
            last_commit: last_commit_time(&observation.commits),
            build_failure: latest_failure(&failed, important_checks),
            merge_conflict: has_merge_conflict(observation.mergeable),
            warnings: WarningRecord::scan(&observation.comments, bot_login),
            latest_member_activity: latest_member_activity(
                &observation.comments,
                &observation.reviews,
                members,
                bot_login,
            ),
        };
        debug!("Extracted facts: {:?}", facts);
        facts
    }

    /// Whether any member has ever commented or reviewed
    pub fn member_engaged(&self) -> bool {
        self.latest_member_activity.is_some()
    }
}

/// Label from `skip_labels` carried by the PR, if any
pub fn skip_label<'a>(labels: &[String], skip_labels: &'a [String]) -> Option<&'a str> {
    skip_labels
        .iter()
        .find(|skip| labels.iter().any(|label| label == *skip))
        .map(String::as_str)
}

/// Merge check runs and commit statuses into the set of currently failing checks
///
/// Both sources are keyed by name/context. For every name only the most
/// recent result is kept, and the name is reported only if that result is
/// a failure.
pub fn failing_checks(check_runs: &[CheckRun], statuses: &[CommitStatus]) -> Vec<FailedCheck> {
    let runs = check_runs.iter().filter_map(|run| {
        let when = run.completed_at.or(run.started_at)?;
        let failed = run.conclusion == Some(CheckConclusion::Failure);
        Some((run.name.as_str(), when, failed))
    });
    let statuses = statuses.iter().map(|status| {
        (
            status.context.as_str(),
            status.updated_at,
            status.state == CheckState::Failure,
        )
    });

    let mut latest: HashMap<&str, (DateTime<Utc>, bool)> = HashMap::new();
    for (name, when, failed) in runs.chain(statuses) {
        latest
            .entry(name)
            .and_modify(|entry| {
                if when > entry.0 {
                    *entry = (when, failed);
                }
            })
            .or_insert((when, failed));
    }

    let mut failed: Vec<FailedCheck> = latest
        .into_iter()
        .filter(|(_, (_, failed))| *failed)
        .map(|(name, (when, _))| FailedCheck {
            name: name.to_string(),
            when,
        })
        .collect();
    failed.sort_by(|a, b| a.name.cmp(&b.name));
    failed
}

/// Most recent failure time, restricted to checks matching `pattern` when set
///
/// Returns `None` if nothing in the (filtered) set failed.
pub fn latest_failure(failed: &[FailedCheck], pattern: Option<&Regex>) -> Option<DateTime<Utc>> {
    failed
        .iter()
        .filter(|check| pattern.is_none_or(|re| re.is_match(&check.name)))
        .map(|check| check.when)
        .max()
}

/// Derive the authoritative review state from member reviews
///
/// Any change request wins over approvals, and the oldest change request
/// anchors the timestamp so a later one does not reset the clock. Without
/// change requests the newest approval is used.
pub fn review_state(reviews: &[Review], members: &MemberPolicy) -> Option<ReviewFact> {
    let submitted = reviews
        .iter()
        .filter(|review| members.is_member(review.author_association))
        .filter_map(|review| review.submitted_at.map(|when| (review.state, when)));

    let mut oldest_change_request: Option<DateTime<Utc>> = None;
    let mut newest_approval: Option<DateTime<Utc>> = None;
    for (state, when) in submitted {
        match state {
            ReviewState::ChangesRequested => {
                oldest_change_request = Some(oldest_change_request.map_or(when, |t| t.min(when)));
            }
            ReviewState::Approved => {
                newest_approval = Some(newest_approval.map_or(when, |t| t.max(when)));
            }
            _ => {}
        }
    }

    oldest_change_request
        .map(|when| ReviewFact {
            kind: ReviewKind::ChangesRequested,
            when,
        })
        .or(newest_approval.map(|when| ReviewFact {
            kind: ReviewKind::Approved,
            when,
        }))
}

/// Time of the chronologically last commit
pub fn last_commit_time(commits: &[Commit]) -> Option<DateTime<Utc>> {
    commits.last().and_then(|commit| commit.committed_at)
}

/// Only a definite "not mergeable" counts; unknown mergeability never escalates
pub fn has_merge_conflict(mergeable: Option<bool>) -> bool {
    mergeable == Some(false)
}

/// GitHub logins are case-insensitive
fn is_authored_by(comment: &IssueComment, login: &str) -> bool {
    comment.author.eq_ignore_ascii_case(login)
}

fn is_bot_notice(comment: &IssueComment, bot_login: &str) -> bool {
    is_authored_by(comment, bot_login) && Marker::any_in(&comment.body)
}

/// Newest comment or submitted review authored by a member
///
/// The bot's own notices never count as engagement, even when the bot
/// posts with a member's token. A member quoting a marker still counts.
pub fn latest_member_activity(
    comments: &[IssueComment],
    reviews: &[Review],
    members: &MemberPolicy,
    bot_login: &str,
) -> Option<DateTime<Utc>> {
    let comment_times = comments
        .iter()
        .filter(|comment| members.is_member(comment.author_association))
        .filter(|comment| !is_bot_notice(comment, bot_login))
        .map(|comment| comment.created_at);
    let review_times = reviews
        .iter()
        .filter(|review| members.is_member(review.author_association))
        .filter_map(|review| review.submitted_at);

    comment_times.chain(review_times).max()
}

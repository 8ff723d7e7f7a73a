//! Staleness classification
//!
//! Decides from a PR's facts whether it is stale, why, and since when.
//! Reasons are checked in a fixed priority order and the first match wins.

use crate::facts::{PrFacts, ReviewKind};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Why a PR is considered stale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    #[strum(to_string = "changes requested")]
    ChangesRequested,
    #[strum(to_string = "build failing")]
    BuildFailing,
    #[strum(to_string = "merge conflicts")]
    MergeConflicts,
}

/// A stale PR's reason, anchored to the timestamp its clock started at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleVerdict {
    pub reason: StaleReason,
    pub since: DateTime<Utc>,
}

/// Thresholds the classifier works with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    /// Days before a detected problem counts as stale
    pub stale_days: u32,
    /// Days of unresolved conflicts before a heads-up comment; 0 disables it
    pub merge_conflict_warning_days: u32,
    /// When set, a change request only goes stale if no commit landed after it
    pub require_no_commits_since_review: bool,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            stale_days: 21,
            merge_conflict_warning_days: 3,
            require_no_commits_since_review: false,
        }
    }
}

/// Outcome of classifying one PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Healthy, or not problematic for long enough
    NotStale,
    /// Stale; hand the verdict to the resolver
    Stale(StaleVerdict),
    /// Conflicting for a while but not yet stale: post an early heads-up.
    /// This bypasses the resolver and is not deduplicated.
    WarnMergeConflict,
}

impl Classification {
    /// The stale verdict, if any
    pub fn verdict(&self) -> Option<&StaleVerdict> {
        match self {
            Classification::Stale(verdict) => Some(verdict),
            _ => None,
        }
    }
}

/// `timestamp + days < now`
pub fn is_older_than(timestamp: DateTime<Utc>, days: u32, now: DateTime<Utc>) -> bool {
    timestamp + Duration::days(i64::from(days)) < now
}

/// Classify a PR's facts against the policy at `now`
pub fn classify(facts: &PrFacts, policy: &StalenessPolicy, now: DateTime<Utc>) -> Classification {
    let stale = |since: DateTime<Utc>| is_older_than(since, policy.stale_days, now);

    if let (Some(review), Some(last_commit)) = (facts.review, facts.last_commit) {
        let addressed = policy.require_no_commits_since_review && last_commit > review.when;
        if review.kind == ReviewKind::ChangesRequested && !addressed && stale(review.when) {
            return Classification::Stale(StaleVerdict {
                reason: StaleReason::ChangesRequested,
                since: review.when,
            });
        }
    }

    if let Some(failed_at) = facts.build_failure {
        if stale(failed_at) {
            return Classification::Stale(StaleVerdict {
                reason: StaleReason::BuildFailing,
                since: failed_at,
            });
        }
    }

    if facts.merge_conflict {
        if let Some(last_commit) = facts.last_commit {
            if stale(last_commit) {
                return Classification::Stale(StaleVerdict {
                    reason: StaleReason::MergeConflicts,
                    since: last_commit,
                });
            }
            if policy.merge_conflict_warning_days > 0
                && is_older_than(last_commit, policy.merge_conflict_warning_days, now)
            {
                return Classification::WarnMergeConflict;
            }
        }
    }

    Classification::NotStale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::ReviewFact;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn change_request(days: i64) -> Option<ReviewFact> {
        Some(ReviewFact {
            kind: ReviewKind::ChangesRequested,
            when: days_ago(days),
        })
    }

    #[test]
    fn test_is_older_than_is_strict() {
        assert!(is_older_than(days_ago(22), 21, now()));
        assert!(!is_older_than(days_ago(21), 21, now()));
        assert!(!is_older_than(days_ago(3), 21, now()));
    }

    #[test]
    fn test_healthy_pr_is_not_stale() {
        let facts = PrFacts::default();
        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::NotStale
        );
    }

    #[test]
    fn test_changes_requested_stale() {
        let facts = PrFacts {
            review: change_request(30),
            last_commit: Some(days_ago(40)),
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::Stale(StaleVerdict {
                reason: StaleReason::ChangesRequested,
                since: days_ago(30),
            })
        );
    }

    #[test]
    fn test_changes_requested_needs_a_commit() {
        let facts = PrFacts {
            review: change_request(30),
            last_commit: None,
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::NotStale
        );
    }

    #[test]
    fn test_commit_after_review_ignored_by_default() {
        let facts = PrFacts {
            review: change_request(30),
            last_commit: Some(days_ago(2)),
            ..Default::default()
        };

        let verdict = classify(&facts, &StalenessPolicy::default(), now());
        assert_eq!(
            verdict.verdict().map(|v| v.reason),
            Some(StaleReason::ChangesRequested)
        );
    }

    #[test]
    fn test_commit_after_review_respected_when_required() {
        let facts = PrFacts {
            review: change_request(30),
            last_commit: Some(days_ago(2)),
            ..Default::default()
        };
        let policy = StalenessPolicy {
            require_no_commits_since_review: true,
            ..Default::default()
        };

        assert_eq!(classify(&facts, &policy, now()), Classification::NotStale);
    }

    #[test]
    fn test_approved_review_never_stale() {
        let facts = PrFacts {
            review: Some(ReviewFact {
                kind: ReviewKind::Approved,
                when: days_ago(90),
            }),
            last_commit: Some(days_ago(90)),
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::NotStale
        );
    }

    #[test]
    fn test_changes_requested_takes_priority_over_build() {
        let facts = PrFacts {
            review: change_request(25),
            last_commit: Some(days_ago(40)),
            build_failure: Some(days_ago(35)),
            merge_conflict: true,
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now())
                .verdict()
                .map(|v| v.reason),
            Some(StaleReason::ChangesRequested)
        );
    }

    #[test]
    fn test_build_failing_stale() {
        let facts = PrFacts {
            build_failure: Some(days_ago(25)),
            last_commit: Some(days_ago(26)),
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::Stale(StaleVerdict {
                reason: StaleReason::BuildFailing,
                since: days_ago(25),
            })
        );
    }

    #[test]
    fn test_recent_build_failure_not_stale() {
        let facts = PrFacts {
            build_failure: Some(days_ago(1)),
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::NotStale
        );
    }

    #[test]
    fn test_merge_conflicts_stale_since_last_commit() {
        let facts = PrFacts {
            merge_conflict: true,
            last_commit: Some(days_ago(30)),
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::Stale(StaleVerdict {
                reason: StaleReason::MergeConflicts,
                since: days_ago(30),
            })
        );
    }

    #[test]
    fn test_merge_conflict_heads_up_window() {
        let facts = PrFacts {
            merge_conflict: true,
            last_commit: Some(days_ago(4)),
            ..Default::default()
        };

        assert_eq!(
            classify(&facts, &StalenessPolicy::default(), now()),
            Classification::WarnMergeConflict
        );

        let fresh = PrFacts {
            last_commit: Some(days_ago(1)),
            ..facts.clone()
        };
        assert_eq!(
            classify(&fresh, &StalenessPolicy::default(), now()),
            Classification::NotStale
        );
    }

    #[test]
    fn test_merge_conflict_heads_up_disabled_with_zero() {
        let facts = PrFacts {
            merge_conflict: true,
            last_commit: Some(days_ago(4)),
            ..Default::default()
        };
        let policy = StalenessPolicy {
            merge_conflict_warning_days: 0,
            ..Default::default()
        };

        assert_eq!(classify(&facts, &policy, now()), Classification::NotStale);
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(StaleReason::ChangesRequested.to_string(), "changes requested");
        assert_eq!(StaleReason::BuildFailing.to_string(), "build failing");
        assert_eq!(StaleReason::MergeConflicts.to_string(), "merge conflicts");
    }
}

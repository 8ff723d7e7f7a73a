//! Run metrics
//!
//! `Metrics` is the private accumulator the run loop updates once per PR.
//! It is frozen into an immutable `RunSummary` when the run ends, whether
//! it ended well or not.

use crate::error::RunError;
use anyhow::Context;
use log::{error, info};
use serde::{Deserialize, Serialize};
use stale_pr_core::{Action, Classification, StaleReason};
use std::fmt;
use std::path::Path;

#[derive(Debug, Default)]
pub(crate) struct Metrics {
    processed: usize,
    skipped: usize,
    stale_changes_requested: usize,
    stale_build_failing: usize,
    stale_merge_conflicts: usize,
    conflict_warnings: usize,
    warned: usize,
    closed: usize,
    failed: usize,
}

impl Metrics {
    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Record a PR that went through the whole pipeline
    pub(crate) fn record_processed(&mut self, classification: &Classification, action: Action) {
        self.processed += 1;

        match classification {
            Classification::Stale(verdict) => match verdict.reason {
                StaleReason::ChangesRequested => self.stale_changes_requested += 1,
                StaleReason::BuildFailing => self.stale_build_failing += 1,
                StaleReason::MergeConflicts => self.stale_merge_conflicts += 1,
            },
            Classification::WarnMergeConflict => self.conflict_warnings += 1,
            Classification::NotStale => {}
        }

        match action {
            Action::Warn => self.warned += 1,
            Action::Close => self.closed += 1,
            Action::Nothing => {}
        }
    }

    pub(crate) fn summary(&self, dry_run: bool) -> RunSummary {
        RunSummary {
            processed: self.processed,
            skipped: self.skipped,
            stale_changes_requested: self.stale_changes_requested,
            stale_build_failing: self.stale_build_failing,
            stale_merge_conflicts: self.stale_merge_conflicts,
            conflict_warnings: self.conflict_warnings,
            warned: self.warned,
            closed: self.closed,
            failed: self.failed,
            dry_run,
        }
    }
}

/// What one run did, reported to the scheduler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub stale_changes_requested: usize,
    pub stale_build_failing: usize,
    pub stale_merge_conflicts: usize,
    pub conflict_warnings: usize,
    pub warned: usize,
    pub closed: usize,
    pub failed: usize,
    /// Whether writes were only simulated
    pub dry_run: bool,
}

impl RunSummary {
    /// Stale PRs across all reasons
    pub fn stale_total(&self) -> usize {
        self.stale_changes_requested + self.stale_build_failing + self.stale_merge_conflicts
    }

    /// Log the summary at info level
    pub fn log(&self) {
        info!("Run summary: {}", self);
        info!(
            "Stale by reason: changes requested {}, build failing {}, merge conflicts {}",
            self.stale_changes_requested, self.stale_build_failing, self.stale_merge_conflicts
        );
    }

    /// Write the summary as pretty JSON
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run summary to {}", path.display()))
    }
}

/// Log the outcome of a run and optionally write its summary as JSON
///
/// A failed run keeps its own error even when the summary cannot be
/// written; the write failure is only logged then.
pub fn report(
    outcome: Result<RunSummary, RunError>,
    summary_file: Option<&Path>,
) -> anyhow::Result<RunSummary> {
    let summary = match &outcome {
        Ok(summary) => summary,
        Err(err) => err.summary(),
    };
    summary.log();

    let written = summary_file.map_or(Ok(()), |path| summary.write_json(path));
    match (outcome, written) {
        (Ok(summary), written) => written.map(|()| summary),
        (Err(err), Err(write_err)) => {
            error!("{:#}", write_err);
            Err(err.into())
        }
        (Err(err), Ok(())) => Err(err.into()),
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} stale, {} warned, {} closed, {} conflict heads-ups",
            self.processed,
            self.skipped,
            self.stale_total(),
            self.warned,
            self.closed,
            self.conflict_warnings
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        if self.dry_run {
            write!(f, " (dry run)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use stale_pr_core::StaleVerdict;

    fn stale(reason: StaleReason) -> Classification {
        Classification::Stale(StaleVerdict {
            reason,
            since: Utc::now(),
        })
    }

    #[test]
    fn test_metrics_accumulate_into_summary() {
        let mut metrics = Metrics::default();
        metrics.record_skipped();
        metrics.record_processed(&Classification::NotStale, Action::Nothing);
        metrics.record_processed(&stale(StaleReason::BuildFailing), Action::Warn);
        metrics.record_processed(&stale(StaleReason::ChangesRequested), Action::Close);
        metrics.record_processed(&stale(StaleReason::ChangesRequested), Action::Nothing);
        metrics.record_processed(&Classification::WarnMergeConflict, Action::Nothing);
        metrics.record_failed();

        let summary = metrics.summary(true);
        assert_eq!(
            summary,
            RunSummary {
                processed: 5,
                skipped: 1,
                stale_changes_requested: 2,
                stale_build_failing: 1,
                stale_merge_conflicts: 0,
                conflict_warnings: 1,
                warned: 1,
                closed: 1,
                failed: 1,
                dry_run: true,
            }
        );
        assert_eq!(summary.stale_total(), 3);
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            processed: 3,
            warned: 1,
            dry_run: true,
            ..Default::default()
        };
        assert_eq!(
            summary.to_string(),
            "3 processed, 0 skipped, 0 stale, 1 warned, 0 closed, 0 conflict heads-ups (dry run)"
        );
    }

    fn unwritable_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join("stale-pr-bot-missing-dir")
            .join("nested")
            .join("summary.json")
    }

    #[test]
    fn test_report_keeps_run_error_when_summary_write_fails() {
        let outcome = Err(RunError::PartialFailure {
            failed: vec![7],
            summary: RunSummary {
                processed: 2,
                failed: 1,
                ..Default::default()
            },
        });

        let err = report(outcome, Some(&unwritable_path())).unwrap_err();

        match err.downcast_ref::<RunError>() {
            Some(RunError::PartialFailure { failed, .. }) => assert_eq!(failed, &vec![7]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_report_surfaces_write_failure_after_successful_run() {
        let err = report(Ok(RunSummary::default()), Some(&unwritable_path())).unwrap_err();
        assert!(err.downcast_ref::<RunError>().is_none());
        assert!(err.to_string().contains("Failed to write run summary"));
    }

    #[test]
    fn test_report_writes_json() {
        let path = std::env::temp_dir().join(format!(
            "stale-pr-bot-summary-{}.json",
            std::process::id()
        ));
        let summary = RunSummary {
            warned: 3,
            ..Default::default()
        };

        let returned = report(Ok(summary.clone()), Some(&path)).unwrap();

        let written: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(returned, summary);
        assert_eq!(written, summary);
    }

    #[test]
    fn test_summary_json_field_names() {
        let json = serde_json::to_value(RunSummary::default()).unwrap();
        assert_eq!(json["stale_build_failing"], 0);
        assert_eq!(json["dry_run"], false);
    }
}

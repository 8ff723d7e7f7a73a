//! Action resolution
//!
//! The per-PR state machine. The only state is what earlier runs left in
//! the comment trail: the newest stale warning, and whether a member has
//! spoken since.
//!
//! ```text
//!             no verdict
//!   ┌─────────────────────────────► Nothing
//!   │
//!   │ verdict, no live warning       (none / predates `since` / member engaged after it)
//!   ├─────────────────────────────► Warn
//!   │
//!   │ verdict, live warning, now <  warned + responseDays
//!   ├─────────────────────────────► Nothing
//!   │
//!   │ verdict, live warning, now >= warned + responseDays
//!   └─────────────────────────────► Close
//! ```

use crate::classifier::StaleVerdict;
use crate::facts::WarningRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// What to do with a PR this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Nothing,
    Warn,
    Close,
}

/// Decide the action for a PR
///
/// * `verdict` - classifier output for this run
/// * `warnings` - bot notices found in the comment trail
/// * `latest_member_activity` - newest member comment or review
/// * `response_days` - grace period between warning and closing
pub fn resolve(
    verdict: Option<&StaleVerdict>,
    warnings: &WarningRecord,
    latest_member_activity: Option<DateTime<Utc>>,
    response_days: u32,
    now: DateTime<Utc>,
) -> Action {
    let Some(verdict) = verdict else {
        return Action::Nothing;
    };

    let Some(warned_at) = warnings.stale_pr else {
        return Action::Warn;
    };

    let superseded = warned_at < verdict.since;
    let member_engaged_since = latest_member_activity.is_some_and(|t| t > warned_at);
    if superseded || member_engaged_since {
        return Action::Warn;
    }

    if now >= warned_at + Duration::days(i64::from(response_days)) {
        Action::Close
    } else {
        Action::Nothing
    }
}

//! Comment bodies posted by the bot

use crate::classifier::StaleReason;
use crate::marker::Marker;

/// Placeholder in the warn template replaced by the stale reason
pub const STATE_PLACEHOLDER: &str = "STATE";

/// Default warning text, generated from the configured thresholds
pub fn default_warn_message(stale_days: u32, response_days: u32) -> String {
    format!(
        "This pull request has been marked as stale because it has had `{}` for more than \
         {} days. It will be closed in {} days if no further activity occurs.",
        STATE_PLACEHOLDER, stale_days, response_days
    )
}

/// Default closing text
pub fn default_close_message() -> String {
    "Closing this pull request as it has been stale with no activity since the warning."
        .to_string()
}

/// Default merge-conflict heads-up text
pub fn default_merge_conflict_warning() -> String {
    "This pull request has merge conflicts with its base branch. \
     Please resolve them to keep it from going stale."
        .to_string()
}

/// Message templates, already resolved against the configured thresholds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub warn_template: String,
    pub close: String,
    pub merge_conflict_warning: String,
}

impl Messages {
    /// All defaults for the given thresholds
    pub fn defaults(stale_days: u32, response_days: u32) -> Self {
        Self {
            warn_template: default_warn_message(stale_days, response_days),
            close: default_close_message(),
            merge_conflict_warning: default_merge_conflict_warning(),
        }
    }

    /// Stale warning body; carries the stale-pr marker
    pub fn warning(&self, reason: StaleReason) -> String {
        with_marker(
            Marker::StalePr,
            &self
                .warn_template
                .replace(STATE_PLACEHOLDER, &reason.to_string()),
        )
    }

    /// Merge-conflict heads-up body; carries the merge-conflict marker only
    pub fn conflict_warning(&self) -> String {
        with_marker(Marker::MergeConflict, &self.merge_conflict_warning)
    }

    /// Closing body; unmarked
    pub fn closing(&self) -> String {
        self.close.clone()
    }
}

fn with_marker(marker: Marker, text: &str) -> String {
    format!("{}\n{}", marker.encode(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_warning_mentions_thresholds_and_reason() {
        let messages = Messages::defaults(21, 10);
        let body = messages.warning(StaleReason::BuildFailing);

        assert!(body.starts_with(&Marker::StalePr.encode()));
        assert!(body.contains("`build failing`"));
        assert!(body.contains("21 days"));
        assert!(body.contains("closed in 10 days"));
        assert!(!body.contains(STATE_PLACEHOLDER));
    }

    #[test]
    fn test_custom_template_substitutes_every_placeholder() {
        let messages = Messages {
            warn_template: "STATE! really, STATE.".to_string(),
            ..Messages::defaults(21, 10)
        };

        let body = messages.warning(StaleReason::MergeConflicts);
        assert!(body.ends_with("merge conflicts! really, merge conflicts."));
    }

    #[test]
    fn test_conflict_warning_is_not_a_stale_warning() {
        let body = Messages::defaults(21, 10).conflict_warning();
        assert!(Marker::MergeConflict.is_in(&body));
        assert!(!Marker::StalePr.is_in(&body));
    }

    #[test]
    fn test_closing_is_unmarked() {
        let body = Messages::defaults(21, 10).closing();
        assert!(!Marker::any_in(&body));
    }
}

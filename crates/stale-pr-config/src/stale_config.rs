//! Bot configuration
//!
//! `StaleConfig` is the raw, serde-facing form loaded from TOML and then
//! overridden by the command line. `resolve()` validates it into a
//! `ResolvedConfig`, the only form the run loop accepts.

use crate::error::ConfigError;
use gh_client::{AuthorAssociation, DEFAULT_HOST};
use regex::Regex;
use serde::{Deserialize, Serialize};
use stale_pr_core::{MemberPolicy, Messages, StalenessPolicy};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Upper bound for every day-count option (about 27 years)
const MAX_DAYS: i64 = 10_000;

/// Configuration as written by the user
///
/// Keys are snake_case; the camelCase spellings used by the action inputs
/// are accepted as aliases.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StaleConfig {
    /// Target repository as `owner/repo`
    #[serde(default)]
    pub repository: Option<String>,

    /// GitHub host (github.com or a GitHub Enterprise host)
    #[serde(default = "default_host")]
    pub host: String,

    /// Days before a detected problem counts as stale
    #[serde(default = "default_stale_days", alias = "staleDays")]
    pub stale_days: i64,

    /// Grace period after the warning before closing
    #[serde(default = "default_response_days", alias = "responseDays")]
    pub response_days: i64,

    /// Days of unresolved conflicts before an early heads-up (0 disables)
    #[serde(
        default = "default_merge_conflict_warning_days",
        alias = "mergeConflictWarningDays"
    )]
    pub merge_conflict_warning_days: i64,

    /// Only failing checks whose name matches count toward build staleness
    #[serde(default, alias = "importantChecksRegex")]
    pub important_checks_regex: Option<String>,

    /// PRs carrying any of these labels are left alone
    #[serde(default, alias = "skipLabels")]
    pub skip_labels: Vec<String>,

    /// Warning template; `STATE` is replaced by the stale reason
    #[serde(default, alias = "warnMessage")]
    pub warn_message: Option<String>,

    /// Message posted when closing
    #[serde(default = "default_close_message", alias = "closeMessage")]
    pub close_message: String,

    /// Message posted as the merge-conflict heads-up
    #[serde(
        default = "default_merge_conflict_warning",
        alias = "mergeConflictWarning"
    )]
    pub merge_conflict_warning: String,

    /// Label applied when closing
    #[serde(default, alias = "closeLabel")]
    pub close_label: Option<String>,

    /// Log intended writes instead of performing them
    #[serde(default, alias = "dryRun")]
    pub dry_run: bool,

    /// Author associations that count as "member"
    #[serde(default = "default_member_associations", alias = "memberAssociations")]
    pub member_associations: Vec<AuthorAssociation>,

    /// Change requests only go stale if no commit landed after the review
    #[serde(default, alias = "requireNoCommitsSinceReview")]
    pub require_no_commits_since_review: bool,

    /// Keep going after a PR fails; the run still fails at the end
    #[serde(default, alias = "continueOnError")]
    pub continue_on_error: bool,

    /// Login the bot comments as; asked from GitHub when unset.
    /// Needed for tokens that cannot read `/user`, e.g. `github-actions[bot]`.
    #[serde(default, alias = "botLogin")]
    pub bot_login: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_stale_days() -> i64 {
    21
}

fn default_response_days() -> i64 {
    10
}

fn default_merge_conflict_warning_days() -> i64 {
    3
}

fn default_close_message() -> String {
    stale_pr_core::messages::default_close_message()
}

fn default_merge_conflict_warning() -> String {
    stale_pr_core::messages::default_merge_conflict_warning()
}

fn default_member_associations() -> Vec<AuthorAssociation> {
    vec![
        AuthorAssociation::Owner,
        AuthorAssociation::Member,
        AuthorAssociation::Collaborator,
    ]
}

impl Default for StaleConfig {
    fn default() -> Self {
        Self {
            repository: None,
            host: default_host(),
            stale_days: default_stale_days(),
            response_days: default_response_days(),
            merge_conflict_warning_days: default_merge_conflict_warning_days(),
            important_checks_regex: None,
            skip_labels: Vec::new(),
            warn_message: None,
            close_message: default_close_message(),
            merge_conflict_warning: default_merge_conflict_warning(),
            close_label: None,
            dry_run: false,
            member_associations: default_member_associations(),
            require_no_commits_since_review: false,
            continue_on_error: false,
            bot_login: None,
        }
    }
}

impl StaleConfig {
    /// Load config from an explicit file, or the first one found, or use defaults
    ///
    /// Unlike a missing file, an unreadable or malformed file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match crate::load_config_file(explicit)? {
            Some((path, content)) => {
                let config =
                    toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;
                log::info!("Loaded config from file");
                Ok(config)
            }
            None => {
                log::debug!("Using default config");
                Ok(Self::default())
            }
        }
    }

    /// Validate into the form the run loop uses
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        let stale_days = days("stale_days", self.stale_days, 1)?;
        let response_days = days("response_days", self.response_days, 1)?;
        let merge_conflict_warning_days = days(
            "merge_conflict_warning_days",
            self.merge_conflict_warning_days,
            0,
        )?;

        let repository = self
            .repository
            .as_deref()
            .ok_or(ConfigError::MissingRepository)?
            .parse::<RepoRef>()?;

        let important_checks = self
            .important_checks_regex
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| {
                Regex::new(&pattern).map_err(|source| ConfigError::InvalidRegex { pattern, source })
            })
            .transpose()?;

        let warn_template = match self.warn_message {
            Some(message) if message.trim().is_empty() => {
                return Err(ConfigError::EmptyMessage("warn_message"))
            }
            Some(message) => message,
            None => stale_pr_core::messages::default_warn_message(stale_days, response_days),
        };
        if self.close_message.trim().is_empty() {
            return Err(ConfigError::EmptyMessage("close_message"));
        }
        if self.merge_conflict_warning.trim().is_empty() {
            return Err(ConfigError::EmptyMessage("merge_conflict_warning"));
        }

        Ok(ResolvedConfig {
            repository,
            host: self.host,
            staleness: StalenessPolicy {
                stale_days,
                merge_conflict_warning_days,
                require_no_commits_since_review: self.require_no_commits_since_review,
            },
            response_days,
            important_checks,
            skip_labels: self.skip_labels,
            messages: Messages {
                warn_template,
                close: self.close_message,
                merge_conflict_warning: self.merge_conflict_warning,
            },
            close_label: self.close_label.filter(|label| !label.trim().is_empty()),
            dry_run: self.dry_run,
            members: MemberPolicy::new(self.member_associations),
            continue_on_error: self.continue_on_error,
            bot_login: self
                .bot_login
                .map(|login| login.trim().to_string())
                .filter(|login| !login.is_empty()),
        })
    }
}

fn days(name: &'static str, value: i64, min: i64) -> Result<u32, ConfigError> {
    if !(min..=MAX_DAYS).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max: MAX_DAYS,
        });
    }
    Ok(value as u32)
}

/// A repository coordinate, `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validated configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub repository: RepoRef,
    pub host: String,
    pub staleness: StalenessPolicy,
    pub response_days: u32,
    pub important_checks: Option<Regex>,
    pub skip_labels: Vec<String>,
    pub messages: Messages,
    pub close_label: Option<String>,
    pub dry_run: bool,
    pub members: MemberPolicy,
    pub continue_on_error: bool,
    pub bot_login: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_repo() -> StaleConfig {
        StaleConfig {
            repository: Some("octo/widgets".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = StaleConfig::default();
        assert_eq!(config.stale_days, 21);
        assert_eq!(config.response_days, 10);
        assert_eq!(config.merge_conflict_warning_days, 3);
        assert_eq!(config.host, "github.com");
        assert!(!config.dry_run);
        assert!(config.skip_labels.is_empty());
        assert!(!config.close_message.is_empty());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            repository = "octo/widgets"
            stale_days = 30
            skip_labels = ["pinned", "security"]
        "#;
        let config: StaleConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.stale_days, 30);
        assert_eq!(config.skip_labels, vec!["pinned", "security"]);
        // Other fields should use defaults
        assert_eq!(config.response_days, 10);
        assert_eq!(config.member_associations, default_member_associations());
    }

    #[test]
    fn test_config_accepts_camel_case_aliases() {
        let toml = r#"
            staleDays = 14
            responseDays = 7
            mergeConflictWarningDays = 0
            importantChecksRegex = "^build$"
            closeLabel = "stale"
            dryRun = true
            memberAssociations = ["OWNER"]
            botLogin = "github-actions[bot]"
        "#;
        let config: StaleConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.stale_days, 14);
        assert_eq!(config.response_days, 7);
        assert_eq!(config.merge_conflict_warning_days, 0);
        assert_eq!(config.important_checks_regex.as_deref(), Some("^build$"));
        assert_eq!(config.close_label.as_deref(), Some("stale"));
        assert!(config.dry_run);
        assert_eq!(config.member_associations, vec![AuthorAssociation::Owner]);
        assert_eq!(config.bot_login.as_deref(), Some("github-actions[bot]"));
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = with_repo().resolve().unwrap();
        assert_eq!(
            resolved.repository,
            RepoRef {
                owner: "octo".to_string(),
                name: "widgets".to_string()
            }
        );
        assert_eq!(resolved.staleness, StalenessPolicy::default());
        assert_eq!(resolved.response_days, 10);
        assert!(resolved.important_checks.is_none());
        assert_eq!(resolved.messages, Messages::defaults(21, 10));
        assert!(resolved.members.is_member(AuthorAssociation::Collaborator));
        assert!(!resolved.members.is_member(AuthorAssociation::Contributor));
        assert_eq!(resolved.bot_login, None);
    }

    #[test]
    fn test_resolve_blank_bot_login_means_ask_github() {
        let config = StaleConfig {
            bot_login: Some("  ".to_string()),
            ..with_repo()
        };
        assert_eq!(config.resolve().unwrap().bot_login, None);
    }

    #[test]
    fn test_resolve_rejects_invalid_regex() {
        let config = StaleConfig {
            important_checks_regex: Some("(unclosed".to_string()),
            ..with_repo()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_out_of_range_days() {
        let config = StaleConfig {
            stale_days: 0,
            ..with_repo()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::OutOfRange {
                name: "stale_days",
                ..
            })
        ));

        let config = StaleConfig {
            merge_conflict_warning_days: -1,
            ..with_repo()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_resolve_zero_disables_conflict_warning() {
        let config = StaleConfig {
            merge_conflict_warning_days: 0,
            ..with_repo()
        };
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.staleness.merge_conflict_warning_days, 0);
    }

    #[test]
    fn test_resolve_requires_repository() {
        assert!(matches!(
            StaleConfig::default().resolve(),
            Err(ConfigError::MissingRepository)
        ));
    }

    #[test]
    fn test_resolve_rejects_empty_messages() {
        let config = StaleConfig {
            warn_message: Some("  ".to_string()),
            ..with_repo()
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::EmptyMessage("warn_message"))
        ));
    }

    #[test]
    fn test_custom_warn_message_kept_verbatim() {
        let config = StaleConfig {
            warn_message: Some("Stale: STATE".to_string()),
            ..with_repo()
        };
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.messages.warn_template, "Stale: STATE");
    }

    #[test]
    fn test_repo_ref_parsing() {
        assert!("owner/repo".parse::<RepoRef>().is_ok());
        assert!("owner".parse::<RepoRef>().is_err());
        assert!("/repo".parse::<RepoRef>().is_err());
        assert!("owner/".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
        assert_eq!(
            "owner/repo".parse::<RepoRef>().unwrap().to_string(),
            "owner/repo"
        );
    }
}

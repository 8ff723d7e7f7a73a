//! Command line interface
//!
//! Every option can also come from the environment, so the binary can run
//! unchanged as a scheduled CI job. Values given here override the config
//! file.

use clap::Parser;
use stale_pr_config::StaleConfig;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "stale-pr-bot", version, about = "Warn about and close stale pull requests")]
pub struct Cli {
    /// Config file (default: .stale-pr-bot.toml, then the user config dir)
    #[arg(short, long, env = "STALE_PR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository to process, as owner/repo
    #[arg(short, long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// GitHub host (github.com or a GitHub Enterprise host)
    #[arg(long, env = "STALE_PR_HOST")]
    pub host: Option<String>,

    /// Days before a detected problem counts as stale
    #[arg(long, env = "STALE_PR_STALE_DAYS")]
    pub stale_days: Option<i64>,

    /// Grace period in days between warning and closing
    #[arg(long, env = "STALE_PR_RESPONSE_DAYS")]
    pub response_days: Option<i64>,

    /// Days of unresolved conflicts before a heads-up comment (0 disables)
    #[arg(long, env = "STALE_PR_MERGE_CONFLICT_WARNING_DAYS")]
    pub merge_conflict_warning_days: Option<i64>,

    /// Only failing checks matching this pattern count as a failing build
    #[arg(long, env = "STALE_PR_IMPORTANT_CHECKS_REGEX")]
    pub important_checks_regex: Option<String>,

    /// Comma-separated labels that exclude a PR entirely
    #[arg(long, env = "STALE_PR_SKIP_LABELS", value_delimiter = ',')]
    pub skip_labels: Option<Vec<String>>,

    /// Warning template; STATE is replaced by the stale reason
    #[arg(long, env = "STALE_PR_WARN_MESSAGE")]
    pub warn_message: Option<String>,

    /// Message posted when closing
    #[arg(long, env = "STALE_PR_CLOSE_MESSAGE")]
    pub close_message: Option<String>,

    /// Message posted as the merge-conflict heads-up
    #[arg(long, env = "STALE_PR_MERGE_CONFLICT_WARNING")]
    pub merge_conflict_warning: Option<String>,

    /// Label applied when closing
    #[arg(long, env = "STALE_PR_CLOSE_LABEL")]
    pub close_label: Option<String>,

    /// Log intended writes instead of performing them
    #[arg(long, env = "STALE_PR_DRY_RUN")]
    pub dry_run: bool,

    /// Only treat change requests as stale when no commit followed the review
    #[arg(long, env = "STALE_PR_REQUIRE_NO_COMMITS_SINCE_REVIEW")]
    pub require_no_commits_since_review: bool,

    /// Keep processing other PRs after one fails (the run still fails)
    #[arg(long, env = "STALE_PR_CONTINUE_ON_ERROR")]
    pub continue_on_error: bool,

    /// Login the bot comments as (default: the token's user)
    #[arg(long, env = "STALE_PR_BOT_LOGIN")]
    pub bot_login: Option<String>,

    /// Write the run summary as JSON to this file
    #[arg(long, env = "STALE_PR_SUMMARY_FILE")]
    pub summary_file: Option<PathBuf>,

    /// Debug logging for the bot's own crates
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Override file/default values with whatever was given on the command line
    pub fn apply_to(&self, config: &mut StaleConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        if self.repository.is_some() {
            config.repository = self.repository.clone();
        }
        set(&mut config.host, &self.host);
        set(&mut config.stale_days, &self.stale_days);
        set(&mut config.response_days, &self.response_days);
        set(
            &mut config.merge_conflict_warning_days,
            &self.merge_conflict_warning_days,
        );
        if self.important_checks_regex.is_some() {
            config.important_checks_regex = self.important_checks_regex.clone();
        }
        set(&mut config.skip_labels, &self.skip_labels);
        if self.warn_message.is_some() {
            config.warn_message = self.warn_message.clone();
        }
        set(&mut config.close_message, &self.close_message);
        set(&mut config.merge_conflict_warning, &self.merge_conflict_warning);
        if self.close_label.is_some() {
            config.close_label = self.close_label.clone();
        }
        if self.bot_login.is_some() {
            config.bot_login = self.bot_login.clone();
        }

        // Flags can only switch behavior on
        config.dry_run |= self.dry_run;
        config.require_no_commits_since_review |= self.require_no_commits_since_review;
        config.continue_on_error |= self.continue_on_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "stale-pr-bot",
            "--repository",
            "octo/widgets",
            "--stale-days",
            "30",
            "--skip-labels",
            "pinned,security",
            "--dry-run",
            "--bot-login",
            "github-actions[bot]",
        ])
        .unwrap();

        let mut config = StaleConfig {
            response_days: 5,
            ..Default::default()
        };
        cli.apply_to(&mut config);

        assert_eq!(config.repository.as_deref(), Some("octo/widgets"));
        assert_eq!(config.stale_days, 30);
        assert_eq!(config.response_days, 5);
        assert_eq!(config.skip_labels, vec!["pinned", "security"]);
        assert!(config.dry_run);
        assert_eq!(config.bot_login.as_deref(), Some("github-actions[bot]"));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = StaleConfig {
            dry_run: true,
            close_label: Some("stale".to_string()),
            ..Default::default()
        };
        let before = config.clone();

        Cli::default().apply_to(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let result = Cli::try_parse_from(["stale-pr-bot", "--stale-days", "three"]);
        assert!(result.is_err());
    }
}

//! Configuration errors
//!
//! All of these are fatal: the bot aborts before touching any PR.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("invalid important_checks_regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no repository configured; pass --repository owner/repo or set GITHUB_REPOSITORY")]
    MissingRepository,

    #[error("invalid repository {0:?}, expected owner/repo")]
    InvalidRepository(String),

    #[error("{0} must not be empty")]
    EmptyMessage(&'static str),
}

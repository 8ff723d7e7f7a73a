//! Stale pull request bot
//!
//! Wires the pure decisions of `stale-pr-core` to GitHub through
//! `gh-client`. One call to [`run`] is one scheduled run: list the open
//! PRs, observe each, classify, decide, act, and report a [`RunSummary`].

pub mod cli;
pub mod error;
pub mod executor;
pub mod logger;
pub mod observe;
pub mod run;
pub mod summary;

pub use cli::Cli;
pub use error::RunError;
pub use run::run;
pub use summary::{report, RunSummary};

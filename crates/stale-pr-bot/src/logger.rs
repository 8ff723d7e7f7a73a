//! Logging setup using env_logger
//!
//! `RUST_LOG` wins when set. Otherwise everything logs at info, and
//! `--verbose` raises the bot's own crates to debug.

use env_logger::{Builder, Env};
use log::LevelFilter;

const OWN_CRATES: [&str; 4] = ["stale_pr_bot", "stale_pr_core", "stale_pr_config", "gh_client"];

/// Initialize the global logger; call once at startup
pub fn init(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    if verbose && std::env::var_os("RUST_LOG").is_none() {
        for module in OWN_CRATES {
            builder.filter_module(module, LevelFilter::Debug);
        }
    }

    builder.format_timestamp_secs().init();
}

//! Configuration file locations
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/stale-pr-bot/config.toml`
//! - macOS: `~/Library/Application Support/stale-pr-bot/config.toml`
//! - Windows: `%APPDATA%\stale-pr-bot\config.toml`

use std::path::PathBuf;

const APP_NAME: &str = "stale-pr-bot";

/// Config file looked up in the current working directory
pub const LOCAL_CONFIG_FILE: &str = ".stale-pr-bot.toml";

/// Get the application config directory, if the platform has one
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

/// Get path to the global config file
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get path to the local config file (in CWD)
pub fn local_config_path() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_is_namespaced() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("stale-pr-bot/config.toml"));
        }
    }

    #[test]
    fn test_local_config_path() {
        assert!(local_config_path().ends_with(LOCAL_CONFIG_FILE));
    }
}

use crate::error::ConfigError;
use crate::paths::{global_config_path, local_config_path};
use std::path::{Path, PathBuf};

/// Load config file content
///
/// An explicit path must exist. Otherwise searches:
/// 1. `.stale-pr-bot.toml` in the current working directory
/// 2. `config.toml` in the platform config directory
///
/// Returns the path and content if found, None otherwise.
pub fn load_config_file(explicit: Option<&Path>) -> Result<Option<(PathBuf, String)>, ConfigError> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        return Ok(Some((path.to_path_buf(), content)));
    }

    let candidates = std::iter::once(local_config_path()).chain(global_config_path());
    for path in candidates {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Ok(Some((path, content)));
        }
    }

    Ok(None)
}

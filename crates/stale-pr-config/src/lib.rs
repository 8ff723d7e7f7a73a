//! Configuration for the stale PR bot
//!
//! This crate provides:
//! - Config file discovery (explicit path, CWD, platform config dir)
//! - The TOML-facing `StaleConfig` with defaults
//! - Validation into `ResolvedConfig`, failing fast with `ConfigError`

pub mod config_file;
pub mod error;
pub mod paths;
pub mod stale_config;

pub use config_file::load_config_file;
pub use error::ConfigError;
pub use stale_config::{RepoRef, ResolvedConfig, StaleConfig};

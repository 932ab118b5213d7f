//! Command-line interface.

mod commands;
mod config;
mod status;
mod tick;

pub use commands::{Cli, Commands};
pub use config::show_config;
pub use status::show_status;
pub use tick::run_ticks;

use mimesis::{ConfigError, ConfigErrorKind, MimesisConfig, MimesisResult};
use std::path::{Path, PathBuf};

/// Bundled defaults overlaid with `path`, or the full layered lookup.
fn load_config(path: Option<&Path>) -> MimesisResult<MimesisConfig> {
    match path {
        Some(path) => MimesisConfig::from_file(path),
        None => MimesisConfig::load(),
    }
}

/// The explicit state path, else the configured one.
fn state_path(explicit: Option<PathBuf>, config: &MimesisConfig) -> MimesisResult<PathBuf> {
    explicit
        .or_else(|| config.storage.state_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingStatePath).into())
}

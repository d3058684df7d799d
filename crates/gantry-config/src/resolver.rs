//! Selection of the single authoritative configuration source.
//!
//! Candidate sources are evaluated in a fixed order and the first existing
//! one wins: the explicit `--config` path, `config.json` in the working
//! directory, the platform config directory, and finally the pure
//! environment overlay. Once a file has been located it must parse and
//! validate; there is no silent fallback to the environment.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ConfigError;

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "config.json";

/// Directory under the platform config root holding the application's files.
pub const CONFIG_DIR_NAME: &str = "gantry";

/// Resolves the single configuration for this process run.
///
/// The result is always fully defaulted; a located file that fails to parse
/// or validate aborts resolution with the underlying [`ConfigError`].
pub fn resolve(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match locate(explicit) {
        Some(path) => Config::from_file(&path),
        None => Ok(Config::from_env()),
    }
}

/// Evaluates the source precedence and returns the first existing file.
#[must_use]
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit
        && path.exists()
    {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    platform_config_file().filter(|path| path.exists())
}

fn platform_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|directory| directory.join(CONFIG_DIR_NAME).join(LOCAL_CONFIG_FILE))
}

//! Error types raised while locating, parsing, and validating configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by configuration loading and resolution.
///
/// Both variants are fatal to server start: once a configuration file has
/// been located it must parse and validate, with no silent fallback to the
/// environment overlay.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration path does not exist.
    #[error("configuration file '{path}' was not found")]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// The file extension is unrecognised, or the document violates the
    /// configuration schema. The reason aggregates every violation found
    /// where the source format supports it.
    #[error("unsupported configuration: {reason}")]
    FormatNotSupported {
        /// Human-readable description of the violation(s).
        reason: String,
    },
    /// Reading the located file failed.
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Builds a `FormatNotSupported` error from any displayable reason.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::FormatNotSupported {
            reason: reason.into(),
        }
    }
}

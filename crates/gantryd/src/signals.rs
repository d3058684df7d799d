//! Termination signal handling for the running daemon.

use std::io;

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

const SIGNAL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::signals");

/// Errors reported while waiting for a termination signal.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing the signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Abstraction over the mechanism that decides when shutdown begins.
pub trait ShutdownSignal {
    /// Blocks until shutdown should proceed.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Listener that blocks on the first SIGTERM or SIGINT.
///
/// `wait` returns on the first delivery. Signals arriving afterwards are
/// swallowed rather than fatal: dropping the iterator unregisters its
/// action, but signal-hook keeps its replacement handler installed in place
/// of the default disposition, so a repeated SIGTERM during shutdown cannot
/// kill the process mid-teardown.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl SystemShutdownSignal {
    /// Builds the system signal listener.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = Signals::new([SIGTERM, SIGINT])
            .map_err(|source| ShutdownError::Install { source })?;
        if let Some(signal) = signals.forever().next() {
            info!(target: SIGNAL_TARGET, signal, "termination signal received");
        }
        Ok(())
    }
}

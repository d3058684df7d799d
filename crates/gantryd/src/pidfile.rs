//! PID file lifecycle for the running daemon.
//!
//! The guard writes the process id at start and removes the file when the
//! orchestrator winds down, so the companion `stop` command can locate the
//! process. A pid file naming a live process aborts start; one naming a dead
//! process is treated as stale and overwritten.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use thiserror::Error;
use tracing::{info, warn};

const PIDFILE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pidfile");

/// Name of the pid file written in the working directory.
pub const PID_FILE: &str = "gantryd.pid";

/// Errors surfaced while acquiring the pid file.
#[derive(Debug, Error)]
pub enum PidFileError {
    /// A running daemon already owns the pid file.
    #[error("daemon already running with pid {pid}")]
    AlreadyRunning {
        /// PID recorded in the existing file.
        pid: i32,
    },
    /// Writing the pid file failed.
    #[error("failed to write pid file '{path}': {source}")]
    Write {
        /// PID file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Removing a stale pid file failed.
    #[error("failed to remove stale pid file '{path}': {source}")]
    Cleanup {
        /// PID file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Guard owning the pid file for the duration of one process run.
#[derive(Debug)]
pub struct PidFileGuard {
    path: PathBuf,
}

impl PidFileGuard {
    /// Writes `pid` to `path`, refusing when a live process holds it.
    pub fn acquire(path: &Path, pid: u32) -> Result<Self, PidFileError> {
        if let Some(existing) = read_pid(path) {
            if process_alive(existing) {
                return Err(PidFileError::AlreadyRunning { pid: existing });
            }
            warn!(
                target: PIDFILE_TARGET,
                pid = existing,
                file = %path.display(),
                "removing stale pid file"
            );
            fs::remove_file(path).map_err(|source| PidFileError::Cleanup {
                path: path.to_path_buf(),
                source,
            })?;
        }
        write_pid(path, pid)?;
        info!(
            target: PIDFILE_TARGET,
            pid,
            file = %path.display(),
            "pid file written"
        );
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the owned pid file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => {
                warn!(
                    target: PIDFILE_TARGET,
                    file = %self.path.display(),
                    error = %error,
                    "failed to remove pid file"
                );
            }
            _ => {}
        }
    }
}

fn write_pid(path: &Path, pid: u32) -> Result<(), PidFileError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let map_error = |source| PidFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = options.open(path).map_err(map_error)?;
    writeln!(file, "{pid}").map_err(map_error)?;
    file.sync_all().map_err(map_error)
}

/// Reads and parses a pid file; unreadable or garbled content reads as
/// absent.
#[must_use]
pub fn read_pid(path: &Path) -> Option<i32> {
    let contents = fs::read_to_string(path).ok()?;
    contents.trim().parse().ok()
}

/// Probes whether a process with `pid` is alive.
#[must_use]
pub fn process_alive(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    match kill(Pid::from_raw(pid), None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

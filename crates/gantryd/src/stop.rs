//! The `stop` command: signal a running daemon and escalate if needed.
//!
//! Reads the pid file left by a running daemon, sends `SIGTERM`, and polls
//! for the target to exit. If the target is still alive when the escalation
//! deadline passes, it is killed with `SIGKILL` and the pid file is removed
//! on its behalf. Early exit of the target cancels the escalation. A missing
//! or garbled pid file is not an error: there is nothing to stop.

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tracing::{error, info, warn};

use crate::actors::{Actor, ActorError};
use crate::cli::RunFlags;
use crate::context::{Context, keys};
use crate::lifecycle::LifecycleError;
use crate::pidfile::{self, PID_FILE};
use crate::telemetry::{self, TelemetrySettings};

const STOP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::stop");

/// How long the target gets to exit gracefully before `SIGKILL`.
pub const ESCALATION_TIMEOUT: Duration = Duration::from_millis(120_000);

/// How often the target's liveness is re-checked while waiting.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Sends signals to and probes another process.
///
/// Abstracted so tests can stop a process that does not exist.
pub trait ProcessSignaller {
    /// Requests graceful termination.
    fn terminate(&self, pid: i32) -> io::Result<()>;

    /// Kills the process outright.
    fn kill(&self, pid: i32) -> io::Result<()>;

    /// Whether the process still exists.
    fn alive(&self, pid: i32) -> bool;
}

/// Production signaller backed by `kill(2)`.
#[derive(Debug, Default)]
pub struct SystemSignaller;

impl ProcessSignaller for SystemSignaller {
    fn terminate(&self, pid: i32) -> io::Result<()> {
        kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(io::Error::from)
    }

    fn kill(&self, pid: i32) -> io::Result<()> {
        kill(Pid::from_raw(pid), Signal::SIGKILL).map_err(io::Error::from)
    }

    fn alive(&self, pid: i32) -> bool {
        pidfile::process_alive(pid)
    }
}

/// Actor that stops a running daemon identified by its pid file.
pub struct StopActor<P> {
    pid_path: PathBuf,
    signaller: P,
    escalation: Duration,
    poll: Duration,
}

impl StopActor<SystemSignaller> {
    /// Builds the production stop actor for the default pid file location.
    #[must_use]
    pub fn new() -> Self {
        Self::with_signaller(
            PathBuf::from(PID_FILE),
            SystemSignaller,
            ESCALATION_TIMEOUT,
            POLL_INTERVAL,
        )
    }
}

impl Default for StopActor<SystemSignaller> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ProcessSignaller> StopActor<P> {
    /// Builds a stop actor with injected signalling and timings.
    #[must_use]
    pub fn with_signaller(
        pid_path: PathBuf,
        signaller: P,
        escalation: Duration,
        poll: Duration,
    ) -> Self {
        Self {
            pid_path,
            signaller,
            escalation,
            poll,
        }
    }

    fn stop_process(&self, pid: i32) {
        info!(target: STOP_TARGET, pid, "requesting graceful termination");
        if let Err(source) = self.signaller.terminate(pid) {
            warn!(
                target: STOP_TARGET,
                pid,
                error = %source,
                "termination request not delivered"
            );
        }
        let deadline = Instant::now() + self.escalation;
        while Instant::now() < deadline {
            if !self.signaller.alive(pid) {
                info!(target: STOP_TARGET, pid, "process exited");
                return;
            }
            thread::sleep(self.poll);
        }
        warn!(target: STOP_TARGET, pid, "escalating to forceful kill");
        if let Err(source) = self.signaller.kill(pid) {
            warn!(
                target: STOP_TARGET,
                pid,
                error = %source,
                "forceful kill not delivered"
            );
        }
        if let Err(source) = std::fs::remove_file(&self.pid_path) {
            warn!(
                target: STOP_TARGET,
                path = %self.pid_path.display(),
                error = %source,
                "could not remove pid file"
            );
        }
    }
}

impl<P: ProcessSignaller> Actor for StopActor<P> {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn run(&mut self, context: &mut Context) -> Result<(), ActorError> {
        if let Some(config) = context.config() {
            info!(
                target: STOP_TARGET,
                address = %config.server.address,
                port = config.server.port,
                "attempting to stop the server"
            );
        }
        match pidfile::read_pid(&self.pid_path) {
            Some(pid) => self.stop_process(pid),
            None => {
                error!(
                    target: STOP_TARGET,
                    path = %self.pid_path.display(),
                    "no readable pid file; nothing to stop"
                );
            }
        }
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        Ok(())
    }
}

/// Runs the `stop` command: console telemetry, the resolved configuration,
/// then one stop actor.
pub fn run_stop(flags: &RunFlags) -> Result<(), LifecycleError> {
    let settings = TelemetrySettings {
        verbose: flags.verbose,
        log_to_file: false,
    };
    telemetry::initialise(&settings)?;
    let config = gantry_config::resolve(flags.config.as_deref())?;
    let mut context = Context::new();
    context.insert(keys::PARAMETERS, flags.clone());
    context.insert(keys::CONFIGURATION, config);
    let mut actor = StopActor::new();
    actor
        .run(&mut context)
        .map_err(|source| LifecycleError::ActorStart {
            name: "stop",
            source,
        })?;
    actor
        .shutdown(&mut context)
        .map_err(|source| LifecycleError::ActorStart {
            name: "stop",
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;
    use std::io::Write;
    use std::rc::Rc;

    use rstest::rstest;
    use tempfile::TempDir;

    use gantry_config::Config;

    use super::*;

    #[derive(Default)]
    struct Recording {
        terminated: Vec<i32>,
        killed: Vec<i32>,
    }

    struct FakeSignaller {
        record: Rc<RefCell<Recording>>,
        alive_polls: RefCell<u32>,
        dies_after_polls: Option<u32>,
    }

    impl FakeSignaller {
        fn new(record: Rc<RefCell<Recording>>, dies_after_polls: Option<u32>) -> Self {
            Self {
                record,
                alive_polls: RefCell::new(0),
                dies_after_polls,
            }
        }
    }

    impl ProcessSignaller for FakeSignaller {
        fn terminate(&self, pid: i32) -> io::Result<()> {
            self.record.borrow_mut().terminated.push(pid);
            Ok(())
        }

        fn kill(&self, pid: i32) -> io::Result<()> {
            self.record.borrow_mut().killed.push(pid);
            Ok(())
        }

        fn alive(&self, _pid: i32) -> bool {
            let polls = {
                let mut polls = self.alive_polls.borrow_mut();
                *polls += 1;
                *polls
            };
            match self.dies_after_polls {
                Some(limit) => polls <= limit,
                None => true,
            }
        }
    }

    fn write_pid_file(directory: &TempDir, contents: &str) -> PathBuf {
        let path = directory.path().join(PID_FILE);
        let mut file = fs::File::create(&path).expect("create pid file");
        file.write_all(contents.as_bytes()).expect("write pid file");
        path
    }

    fn fast_actor(
        path: PathBuf,
        record: Rc<RefCell<Recording>>,
        dies_after_polls: Option<u32>,
    ) -> StopActor<FakeSignaller> {
        StopActor::with_signaller(
            path,
            FakeSignaller::new(record, dies_after_polls),
            Duration::from_millis(20),
            Duration::from_millis(1),
        )
    }

    #[rstest]
    #[case::missing(None)]
    #[case::garbled(Some("not a pid\n"))]
    fn unusable_pid_file_is_not_an_error(#[case] contents: Option<&str>) {
        let directory = TempDir::new().expect("tempdir");
        let path = match contents {
            Some(text) => write_pid_file(&directory, text),
            None => directory.path().join(PID_FILE),
        };
        let record = Rc::new(RefCell::new(Recording::default()));
        let mut actor = fast_actor(path, Rc::clone(&record), Some(0));
        let mut context = Context::new();
        actor.run(&mut context).expect("run succeeds");
        assert!(record.borrow().terminated.is_empty());
    }

    #[test]
    fn configured_server_in_context_does_not_disturb_signalling() {
        let directory = TempDir::new().expect("tempdir");
        let path = write_pid_file(&directory, "4242\n");
        let record = Rc::new(RefCell::new(Recording::default()));
        let mut actor = fast_actor(path, Rc::clone(&record), Some(1));
        let mut context = Context::new();
        context.insert(keys::CONFIGURATION, Config::default());
        actor.run(&mut context).expect("run succeeds");
        assert_eq!(record.borrow().terminated, vec![4242]);
    }

    #[test]
    fn stop_command_resolves_the_configuration() {
        let directory = TempDir::new().expect("tempdir");
        let config_path = directory.path().join("config.json");
        fs::write(&config_path, r#"{"server":{"port":70000}}"#).expect("write config");
        let flags = RunFlags {
            config: Some(config_path),
            verbose: false,
        };
        let error = run_stop(&flags).expect_err("invalid configuration must abort");
        assert!(matches!(error, LifecycleError::Config { .. }));
    }

    #[test]
    fn early_exit_cancels_escalation() {
        let directory = TempDir::new().expect("tempdir");
        let path = write_pid_file(&directory, "4242\n");
        let record = Rc::new(RefCell::new(Recording::default()));
        let mut actor = fast_actor(path.clone(), Rc::clone(&record), Some(2));
        let mut context = Context::new();
        actor.run(&mut context).expect("run succeeds");
        let record = record.borrow();
        assert_eq!(record.terminated, vec![4242]);
        assert!(record.killed.is_empty());
        assert!(path.exists(), "pid file is left for the exiting process");
    }

    #[test]
    fn stubborn_process_is_killed_and_pid_file_removed() {
        let directory = TempDir::new().expect("tempdir");
        let path = write_pid_file(&directory, "4242\n");
        let record = Rc::new(RefCell::new(Recording::default()));
        let mut actor = fast_actor(path.clone(), Rc::clone(&record), None);
        let mut context = Context::new();
        actor.run(&mut context).expect("run succeeds");
        let record = record.borrow();
        assert_eq!(record.terminated, vec![4242]);
        assert_eq!(record.killed, vec![4242]);
        assert!(!path.exists(), "pid file is removed after forceful kill");
    }
}

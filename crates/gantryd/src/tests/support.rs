//! Shared fixtures for the lifecycle behaviour tests.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use tempfile::TempDir;

use crate::actors::{Actor, ActorError};
use crate::context::Context;
use crate::events::{Event, EventBus};
use crate::signals::{ShutdownError, ShutdownSignal};

/// Shutdown trigger that fires as soon as the orchestrator waits on it.
pub(crate) struct ImmediateShutdown;

impl ShutdownSignal for ImmediateShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        Ok(())
    }
}

/// Actor that appends each lifecycle callback it receives to a shared log.
pub(crate) struct RecordingActor {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
    fail_run: bool,
    fail_shutdown: bool,
}

impl RecordingActor {
    pub(crate) fn new(name: &'static str, log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            name,
            log,
            fail_run: false,
            fail_shutdown: false,
        }
    }

    pub(crate) fn failing_run(mut self) -> Self {
        self.fail_run = true;
        self
    }

    pub(crate) fn failing_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }

    fn record(&self, callback: &str) {
        self.log.borrow_mut().push(format!("{}::{callback}", self.name));
    }
}

impl Actor for RecordingActor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn initialize(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        self.record("initialize");
        Ok(())
    }

    fn run(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        self.record("run");
        if self.fail_run {
            return Err(ActorError::Failed {
                reason: "refused to start".to_owned(),
            });
        }
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        self.record("shutdown");
        if self.fail_shutdown {
            return Err(ActorError::Failed {
                reason: "refused to stop".to_owned(),
            });
        }
        Ok(())
    }

    fn destroy(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        self.record("destroy");
        Ok(())
    }
}

/// Subscribes a recorder to every lifecycle event on the bus.
pub(crate) fn record_events(bus: &mut EventBus, seen: &Rc<RefCell<Vec<String>>>) {
    for event in [
        Event::BeforeStart,
        Event::BeforeParseArguments,
        Event::AfterParseArguments,
        Event::BeforeParseConfiguration,
        Event::AfterParseConfiguration,
        Event::AfterLoggingInitialized,
        Event::BeforeStartRunnables,
        Event::AfterStartRunnables,
        Event::BeforeShutdownRunnables,
        Event::AfterShutdownRunnables,
        Event::BeforeShutdownEventSystem,
    ] {
        let seen = Rc::clone(seen);
        bus.subscribe(event, move |_| {
            seen.borrow_mut().push(event.to_string());
        });
    }
}

/// Temporary working area with a minimal configuration file.
pub(crate) struct Workspace {
    directory: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        let directory = TempDir::new().expect("create workspace");
        fs::write(directory.path().join("config.json"), "{}")
            .expect("write configuration");
        Self { directory }
    }

    pub(crate) fn config_path(&self) -> PathBuf {
        self.directory.path().join("config.json")
    }

    pub(crate) fn pid_path(&self) -> PathBuf {
        self.directory.path().join("gantryd.pid")
    }
}

//! Lifecycle orchestration for the `start` command.
//!
//! The orchestrator drives a short linear state machine: it resolves the
//! configuration, brings up logging, starts the fixed actor list
//! sequentially, and blocks until the first termination signal before
//! winding everything down in the same order the actors started. Actors are
//! never started or stopped concurrently, and nothing mutates the lifecycle
//! context outside the orchestrator's own sequential steps.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, info};

use gantry_config::ConfigError;

use crate::actors::{Actor, ActorError, MonitoringActor, ServerActor};
use crate::cli::RunFlags;
use crate::context::{Context, keys};
use crate::events::{Event, EventBus, Payload};
use crate::pidfile::{PID_FILE, PidFileError, PidFileGuard};
use crate::signals::{ShutdownError, ShutdownSignal, SystemShutdownSignal};
use crate::telemetry::{self, TelemetryError, TelemetrySettings};

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Errors surfaced while orchestrating the process lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Acquiring the pid file failed.
    #[error("failed to acquire pid file: {source}")]
    Pid {
        /// Underlying pid file error.
        #[from]
        source: PidFileError,
    },
    /// Resolving the configuration failed.
    #[error("failed to resolve configuration: {source}")]
    Config {
        /// Underlying configuration error.
        #[from]
        source: ConfigError,
    },
    /// Initialising telemetry failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[from]
        source: TelemetryError,
    },
    /// Waiting for the termination signal failed.
    #[error("failed to await termination signal: {source}")]
    Signal {
        /// Underlying signal error.
        #[from]
        source: ShutdownError,
    },
    /// An actor failed to start.
    #[error("actor '{name}' failed to start: {source}")]
    ActorStart {
        /// Name of the failing actor.
        name: &'static str,
        /// Underlying actor error.
        #[source]
        source: ActorError,
    },
}

/// States of the linear lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The orchestrator exists but has done nothing.
    Created,
    /// The configuration is being resolved.
    ConfigLoading,
    /// Logging is initialised; actors have not started.
    LoggingReady,
    /// Actors are starting sequentially.
    ActorsStarting,
    /// Every actor has started; waiting for the termination signal.
    Running,
    /// The termination signal arrived; actors are stopping sequentially.
    ShuttingDown,
    /// Teardown finished; the process is about to exit.
    Terminated,
}

/// Drives one process run from boot to teardown.
pub struct Orchestrator<S> {
    state: LifecycleState,
    bus: EventBus,
    context: Context,
    shutdown: S,
}

impl Orchestrator<SystemShutdownSignal> {
    /// Builds the production orchestrator listening for real signals.
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self::with_shutdown(bus, SystemShutdownSignal::new())
    }
}

impl<S: ShutdownSignal> Orchestrator<S> {
    /// Builds an orchestrator with an injected shutdown trigger.
    #[must_use]
    pub fn with_shutdown(bus: EventBus, shutdown: S) -> Self {
        Self {
            state: LifecycleState::Created,
            bus,
            context: Context::new(),
            shutdown,
        }
    }

    /// Current state, visible for tests and diagnostics.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Runs the whole lifecycle: boot, wait for termination, tear down.
    ///
    /// Actors start sequentially in list order and shut down in that same
    /// order; `destroy` is invoked only after an actor's own `shutdown`
    /// completed. Failures during teardown are logged and do not interrupt
    /// the remaining actors.
    pub fn run(
        mut self,
        flags: &RunFlags,
        pid_path: &Path,
        mut actors: Vec<Box<dyn Actor>>,
    ) -> Result<(), LifecycleError> {
        let _pid = PidFileGuard::acquire(pid_path, std::process::id())?;
        self.bus.publish(Event::BeforeStart, &Payload::None);
        self.advance(LifecycleState::ConfigLoading);

        let arguments: Vec<String> = std::env::args().collect();
        self.bus
            .publish(Event::BeforeParseArguments, &Payload::Arguments(&arguments));
        self.context.insert(keys::PARAMETERS, flags.clone());
        self.bus.publish(Event::AfterParseArguments, &Payload::None);

        self.bus.publish(Event::BeforeParseConfiguration, &Payload::None);
        let config = gantry_config::resolve(flags.config.as_deref())?;
        self.bus
            .publish(Event::AfterParseConfiguration, &Payload::Configuration(&config));

        let settings = TelemetrySettings {
            verbose: flags.verbose,
            log_to_file: config.server.log_to_file,
        };
        let telemetry = telemetry::initialise(&settings)?;
        self.advance(LifecycleState::LoggingReady);
        self.context.insert(keys::CONFIGURATION, config);
        self.context.insert(keys::TELEMETRY, telemetry);
        self.bus.publish(Event::AfterLoggingInitialized, &Payload::None);

        let names: Vec<&'static str> = actors.iter().map(|actor| actor.name()).collect();
        self.bus
            .publish(Event::BeforeStartRunnables, &Payload::Runnables(&names));
        self.advance(LifecycleState::ActorsStarting);
        let mut started: Vec<usize> = Vec::with_capacity(actors.len());
        for (index, actor) in actors.iter_mut().enumerate() {
            let name = actor.name();
            actor
                .initialize(&mut self.context)
                .map_err(|source| LifecycleError::ActorStart { name, source })?;
            actor
                .run(&mut self.context)
                .map_err(|source| LifecycleError::ActorStart { name, source })?;
            info!(target: LIFECYCLE_TARGET, actor = name, "actor started");
            started.push(index);
        }
        self.bus.publish(Event::AfterStartRunnables, &Payload::None);
        self.advance(LifecycleState::Running);

        self.shutdown.wait()?;

        self.advance(LifecycleState::ShuttingDown);
        self.bus
            .publish(Event::BeforeShutdownRunnables, &Payload::None);
        for index in started {
            let actor = &mut actors[index];
            let name = actor.name();
            if let Err(source) = actor.shutdown(&mut self.context) {
                error!(
                    target: LIFECYCLE_TARGET,
                    actor = name,
                    error = %source,
                    "actor failed to shut down"
                );
            }
            if let Err(source) = actor.destroy(&mut self.context) {
                error!(
                    target: LIFECYCLE_TARGET,
                    actor = name,
                    error = %source,
                    "actor failed to destroy"
                );
            }
            info!(target: LIFECYCLE_TARGET, actor = name, "actor stopped");
        }
        self.bus
            .publish(Event::AfterShutdownRunnables, &Payload::None);
        self.bus
            .publish(Event::BeforeShutdownEventSystem, &Payload::None);
        self.bus.clear();
        self.advance(LifecycleState::Terminated);
        info!(target: LIFECYCLE_TARGET, "shutdown sequence completed");
        Ok(())
    }

    fn advance(&mut self, to: LifecycleState) {
        debug!(
            target: LIFECYCLE_TARGET,
            from = ?self.state,
            to = ?to,
            "lifecycle transition"
        );
        self.state = to;
    }
}

/// Installs the subscriptions the logging and database collaborators rely
/// on. The collaborators themselves live outside this crate; these hooks
/// record the moments they attach to.
pub fn install_collaborators(bus: &mut EventBus) {
    bus.subscribe(Event::AfterParseConfiguration, |payload| {
        if let Payload::Configuration(config) = payload {
            debug!(
                target: LIFECYCLE_TARGET,
                host = %config.database.host,
                port = config.database.port,
                name = %config.database.name,
                "database collaborator observed configuration"
            );
        }
    });
    bus.subscribe(Event::AfterLoggingInitialized, |_| {
        debug!(
            target: LIFECYCLE_TARGET,
            "logging collaborator attached"
        );
    });
}

/// Runs the `start` command with the production actor list and signals.
pub fn run_start(flags: &RunFlags) -> Result<(), LifecycleError> {
    let mut bus = EventBus::new();
    install_collaborators(&mut bus);
    let actors: Vec<Box<dyn Actor>> = vec![
        Box::new(MonitoringActor::new()),
        Box::new(ServerActor::new()),
    ];
    Orchestrator::new(bus).run(flags, Path::new(PID_FILE), actors)
}

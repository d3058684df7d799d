//! Bootstrap and lifecycle logic for the Gantry daemon.
//!
//! The daemon wires a small set of sequential actors behind a lifecycle
//! orchestrator: configuration is resolved from file and environment via
//! [`gantry_config`], structured telemetry is initialised, actors start one
//! after another, and the process then blocks until the first termination
//! signal before unwinding in start order. The companion `stop` command
//! signals a running daemon through its pid file and escalates to a forceful
//! kill when the target refuses to exit.

pub mod actors;
pub mod cli;
pub mod context;
pub mod events;
pub mod lifecycle;
pub mod pidfile;
pub mod signals;
pub mod stop;
pub mod telemetry;

pub use actors::{Actor, ActorError, MonitoringActor, ServerActor};
pub use cli::{Cli, Command, RunFlags};
pub use context::Context;
pub use events::{Event, EventBus, Payload};
pub use lifecycle::{LifecycleError, LifecycleState, Orchestrator, run_start};
pub use stop::{ProcessSignaller, StopActor, run_stop};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;

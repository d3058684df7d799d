//! Actor abstraction and the fixed actors started by the `start` command.
//!
//! An actor is a named unit of work with four lifecycle callbacks. `run` and
//! `shutdown` are mandatory; `initialize` and `destroy` are opt-in
//! capabilities with default no-op bodies, so an actor implements only what
//! it needs. Actors are created and owned by the orchestrator for the
//! lifetime of one process run and are driven strictly sequentially.

use std::io;

use thiserror::Error;
use tracing::info;

use crate::context::Context;

const ACTOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::actors");

/// Errors surfaced by actor lifecycle callbacks.
#[derive(Debug, Error)]
pub enum ActorError {
    /// An IO operation performed by the actor failed.
    #[error("{0}")]
    Io(#[from] io::Error),
    /// The actor failed for a domain-specific reason.
    #[error("{reason}")]
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

/// A named unit of work orchestrated sequentially by the lifecycle.
pub trait Actor {
    /// Stable name used in events and logs.
    fn name(&self) -> &'static str;

    /// Called once before `run`, when the actor opts into initialisation.
    fn initialize(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        Ok(())
    }

    /// Performs the actor's function. Must return once the actor is started.
    fn run(&mut self, context: &mut Context) -> Result<(), ActorError>;

    /// Releases the actor's resources during shutdown.
    fn shutdown(&mut self, context: &mut Context) -> Result<(), ActorError>;

    /// Called once after `shutdown`, when the actor opts into teardown.
    fn destroy(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        Ok(())
    }
}

/// Starts the monitoring endpoint.
///
/// The endpoint itself lives outside this crate; the actor only anchors its
/// slot in the start order.
#[derive(Debug, Default)]
pub struct MonitoringActor;

impl MonitoringActor {
    /// Creates the actor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Actor for MonitoringActor {
    fn name(&self) -> &'static str {
        "monitoring"
    }

    fn initialize(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        Ok(())
    }

    fn run(&mut self, context: &mut Context) -> Result<(), ActorError> {
        if let Some(config) = context.config() {
            info!(
                target: ACTOR_TARGET,
                address = %config.management.address,
                port = config.management.port,
                "monitoring actor started"
            );
        }
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        info!(target: ACTOR_TARGET, "monitoring actor stopped");
        Ok(())
    }

    fn destroy(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        Ok(())
    }
}

/// Starts the main server.
///
/// The HTTP surface is out of scope here; the actor records the slot the
/// server occupies in the lifecycle.
#[derive(Debug, Default)]
pub struct ServerActor;

impl ServerActor {
    /// Creates the actor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Actor for ServerActor {
    fn name(&self) -> &'static str {
        "server"
    }

    fn run(&mut self, context: &mut Context) -> Result<(), ActorError> {
        if let Some(config) = context.config() {
            info!(
                target: ACTOR_TARGET,
                address = %config.server.address,
                port = config.server.port,
                "server actor started"
            );
        }
        Ok(())
    }

    fn shutdown(&mut self, _context: &mut Context) -> Result<(), ActorError> {
        info!(target: ACTOR_TARGET, "server actor stopped");
        Ok(())
    }
}

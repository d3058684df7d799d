//! Process-scoped lifecycle context.
//!
//! A heterogeneous key-value store created at process start and owned by the
//! orchestrator. It carries the parsed CLI flags, the resolved
//! configuration, the telemetry handle, and, once established, a generic
//! connection handle. Actors receive a mutable reference; they may add their
//! own entries but must not replace the ones other components depend on.

use std::any::Any;
use std::collections::HashMap;

use gantry_config::Config;

use crate::cli::RunFlags;
use crate::telemetry::TelemetryHandle;

/// Well-known context keys shared between the orchestrator and actors.
pub mod keys {
    /// The resolved configuration.
    pub const CONFIGURATION: &str = "configuration";
    /// The parsed CLI flags.
    pub const PARAMETERS: &str = "parameters";
    /// The telemetry handle.
    pub const TELEMETRY: &str = "telemetry";
    /// The database connection handle.
    pub const CONNECTION: &str = "connection";
}

/// Mutable key-value store threaded through actor lifecycle callbacks.
#[derive(Default)]
pub struct Context {
    values: HashMap<String, Box<dyn Any>>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under a key, replacing any previous entry.
    pub fn insert<T: Any>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_owned(), Box::new(value));
    }

    /// Borrows a value by key, when present and of the requested type.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref())
    }

    /// Mutably borrows a value by key, when present and of the requested
    /// type.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values
            .get_mut(key)
            .and_then(|value| value.downcast_mut())
    }

    /// The resolved configuration, once the orchestrator has stored it.
    #[must_use]
    pub fn config(&self) -> Option<&Config> {
        self.get(keys::CONFIGURATION)
    }

    /// The parsed CLI flags, once the orchestrator has stored them.
    #[must_use]
    pub fn flags(&self) -> Option<&RunFlags> {
        self.get(keys::PARAMETERS)
    }

    /// The telemetry handle, once logging has been initialised.
    #[must_use]
    pub fn telemetry(&self) -> Option<&TelemetryHandle> {
        self.get(keys::TELEMETRY)
    }

    /// The connection handle, once a collaborator has established one.
    #[must_use]
    pub fn connection<T: Any>(&self) -> Option<&T> {
        self.get(keys::CONNECTION)
    }
}

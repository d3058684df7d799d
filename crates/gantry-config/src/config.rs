//! The resolved configuration tree.

use std::path::Path;

use crate::error::ConfigError;
use crate::loader;
use crate::partial::PartialConfig;
use crate::sections::{Cache, Database, Discovery, Mail, Management, RemoteLog, Server};

/// The single authoritative configuration for one process run.
///
/// Constructed exactly once per process start from exactly one source and
/// never mutated afterwards; every field carries either an explicit value or
/// its documented default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server related properties.
    pub server: Server,
    /// Definitions related to the database.
    pub database: Database,
    /// Definitions related to the cache server.
    pub cache: Cache,
    /// Definitions related to service discovery registration.
    pub discovery: Discovery,
    /// Definitions related to the remote log sink.
    pub remote_log: RemoteLog,
    /// Information about the SMTP server to use.
    pub mail: Mail,
    /// Configuration of the management endpoint.
    pub management: Management,
}

impl Config {
    /// Resolves a configuration from a raw document, section by section.
    ///
    /// Each section re-validates its own slice while applying defaults, so a
    /// document that already passed the schema pass is checked a second,
    /// independent time here.
    pub fn resolve(partial: PartialConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            server: Server::resolve(partial.server)?,
            database: Database::resolve(partial.database)?,
            cache: Cache::resolve(partial.cache)?,
            discovery: Discovery::resolve(partial.discovery)?,
            remote_log: RemoteLog::resolve(partial.remote_log)?,
            mail: Mail::resolve(partial.mail)?,
            management: Management::resolve(partial.management)?,
        })
    }

    /// Loads, validates, and resolves a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let partial = loader::load_document(path)?;
        Self::resolve(partial)
    }

    /// Builds a complete configuration purely from environment variables.
    ///
    /// This path never fails: absent variables fall back to the documented
    /// defaults and malformed values are silently defaulted, since
    /// environment-derived configuration must never block process start.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: Server::from_env(),
            database: Database::from_env(),
            cache: Cache::from_env(),
            discovery: Discovery::from_env(),
            remote_log: RemoteLog::from_env(),
            mail: Mail::from_env(),
            management: Management::from_env(),
        }
    }
}

impl Default for Config {
    /// A configuration carrying every documented default.
    fn default() -> Self {
        Self::resolve(PartialConfig::default())
            .unwrap_or_else(|_| unreachable!("an empty document always resolves"))
    }
}

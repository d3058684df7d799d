//! Configuration resolution for the gantry server.
//!
//! The crate owns the full journey from competing configuration sources to a
//! single validated [`Config`]: format loading (JSON, YAML, TOML), closed
//! schema validation, the environment variable overlay, and the fixed source
//! precedence that picks exactly one of them. The daemon consumes the
//! resolved tree; nothing here knows what the server does once started.

mod config;
pub mod defaults;
pub mod env;
mod error;
mod loader;
mod partial;
mod resolver;
mod schema;
mod sections;

pub use config::Config;
pub use error::ConfigError;
pub use loader::load_document;
pub use partial::{
    PartialCache, PartialConfig, PartialDatabase, PartialDiscovery, PartialLimits, PartialMail,
    PartialManagement, PartialRemoteLog, PartialServer, PartialSession,
};
pub use resolver::{CONFIG_DIR_NAME, LOCAL_CONFIG_FILE, locate, resolve};
pub use sections::{
    Cache, Database, DatabaseKind, Discovery, Limits, Mail, Management, RemoteLog, Server, Session,
};

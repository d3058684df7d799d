//! Raw configuration documents as parsed from disk.
//!
//! A partial document may omit any section or field; resolution fills the
//! gaps with the documented defaults. Every struct here rejects unknown
//! fields so the schema stays closed: a typo anywhere in the tree fails the
//! whole document rather than being silently ignored.
//!
//! Document keys are camelCase (`logToFile`, `maxAge`), matching the file
//! formats; the Rust fields stay snake_case via serde renames.

use serde::Deserialize;

/// A whole configuration document with every section optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialConfig {
    /// Self-reference to the schema document; tolerated and ignored.
    #[serde(rename = "$schema")]
    pub schema: Option<String>,
    /// Server section.
    pub server: Option<PartialServer>,
    /// Database section.
    pub database: Option<PartialDatabase>,
    /// Cache section.
    pub cache: Option<PartialCache>,
    /// Discovery section.
    pub discovery: Option<PartialDiscovery>,
    /// Remote log section.
    pub remote_log: Option<PartialRemoteLog>,
    /// Mail section.
    pub mail: Option<PartialMail>,
    /// Management section.
    pub management: Option<PartialManagement>,
}

/// Server section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialServer {
    /// Listen address.
    pub address: Option<String>,
    /// Listen port.
    pub port: Option<i64>,
    /// Whether the server should detach into the background.
    pub background: Option<bool>,
    /// Whether logging to a file is enabled.
    pub log_to_file: Option<bool>,
    /// TLS certificate; requires `key`.
    pub certificate: Option<String>,
    /// TLS private key; requires `certificate`.
    pub key: Option<String>,
    /// Upload directory.
    pub upload: Option<String>,
    /// Session sub-section.
    pub session: Option<PartialSession>,
    /// Limits sub-section.
    pub limits: Option<PartialLimits>,
}

/// Session sub-section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialSession {
    /// Name of the session identifier in storage.
    pub key: Option<String>,
    /// Session lifetime in milliseconds.
    pub max_age: Option<i64>,
}

/// Limits sub-section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialLimits {
    /// Minimum time between consecutive requests, in milliseconds.
    pub time_between_requests: Option<i64>,
    /// Maximum request body size, in bytes.
    pub maximum_request_size: Option<i64>,
    /// Maximum multipart field name size, in bytes.
    pub field_name_size: Option<i64>,
    /// Maximum multipart field value size, in bytes.
    pub field_size: Option<i64>,
    /// Maximum uploaded file size, in bytes.
    pub file_size: Option<i64>,
}

/// Database section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialDatabase {
    /// Database kind; only `postgres` is accepted.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Database host.
    pub host: Option<String>,
    /// Database port.
    pub port: Option<i64>,
    /// Database username.
    pub username: Option<String>,
    /// Database password.
    pub password: Option<String>,
    /// Database name.
    pub name: Option<String>,
}

/// Cache section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialCache {
    /// Cache server host.
    pub host: Option<String>,
    /// Cache server port.
    pub port: Option<i64>,
    /// Cache password.
    pub password: Option<String>,
    /// TLS certificate; requires `key`.
    pub certificate: Option<String>,
    /// TLS private key; requires `certificate`.
    pub key: Option<String>,
}

/// Discovery section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialDiscovery {
    /// Whether discovery registration is enabled.
    pub enabled: Option<bool>,
    /// Discovery agent host.
    pub host: Option<String>,
    /// Discovery agent port.
    pub port: Option<i64>,
    /// Whether a secure connection is required.
    pub secure: Option<bool>,
    /// Datacenter to register in.
    pub datacenter: Option<String>,
    /// Access token.
    pub token: Option<String>,
    /// Trusted certificates in PEM format.
    pub ca: Option<Vec<String>>,
}

/// Remote log section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialRemoteLog {
    /// Whether the remote log sink is enabled.
    pub enabled: Option<bool>,
    /// Account subdomain; required when enabled.
    pub subdomain: Option<String>,
    /// Access token; required when enabled.
    pub token: Option<String>,
    /// Account username; requires `password`.
    pub username: Option<String>,
    /// Account password; requires `username`.
    pub password: Option<String>,
}

/// Mail section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialMail {
    /// SMTP server address.
    pub address: Option<String>,
    /// SMTP server port.
    pub port: Option<i64>,
    /// SMTP username.
    pub username: Option<String>,
    /// SMTP password.
    pub password: Option<String>,
    /// Whether a secure connection should be made.
    pub secure: Option<bool>,
    /// Sender address for outgoing mail.
    pub from: Option<String>,
}

/// Management section of a raw document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PartialManagement {
    /// Management listen address.
    pub address: Option<String>,
    /// Management listen port.
    pub port: Option<i64>,
    /// Management username.
    pub username: Option<String>,
    /// Management password.
    pub password: Option<String>,
}

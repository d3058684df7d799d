//! Typed configuration sections and their resolution rules.
//!
//! Each section resolves through a pure function: `resolve` takes the
//! optional raw slice of the document, validates it fail-fast, and fills the
//! gaps with the documented defaults; `from_env` builds the same section
//! purely from environment variables with lenient fallbacks. Neither path
//! mutates shared state, so defaulting order is explicit and each section is
//! testable in isolation.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::defaults;
use crate::env;
use crate::error::ConfigError;
use crate::partial::{
    PartialCache, PartialDatabase, PartialDiscovery, PartialLimits, PartialMail,
    PartialManagement, PartialRemoteLog, PartialServer, PartialSession,
};

/// Server related properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// The address the server listens on.
    pub address: String,
    /// The port the server listens on; zero selects an ephemeral port.
    pub port: u16,
    /// True when the server should run as a daemon.
    pub background: bool,
    /// True when logging to a file is enabled.
    pub log_to_file: bool,
    /// TLS certificate; always paired with `key`.
    pub certificate: Option<String>,
    /// TLS private key; always paired with `certificate`.
    pub key: Option<String>,
    /// Directory where uploaded files are placed.
    pub upload: String,
    /// Session configuration.
    pub session: Session,
    /// Server limit configuration.
    pub limits: Limits,
}

impl Server {
    /// Resolves the server section from an optional document slice.
    pub fn resolve(partial: Option<PartialServer>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        if partial.certificate.is_some() != partial.key.is_some() {
            return Err(ConfigError::unsupported(
                "server.certificate and server.key must be set together",
            ));
        }
        Ok(Self {
            address: partial
                .address
                .unwrap_or_else(|| defaults::DEFAULT_ADDRESS.to_owned()),
            port: resolve_port("server.port", partial.port, 0, defaults::DEFAULT_SERVER_PORT)?,
            background: partial.background.unwrap_or(true),
            log_to_file: partial.log_to_file.unwrap_or(false),
            certificate: partial.certificate,
            key: partial.key,
            upload: partial
                .upload
                .unwrap_or_else(|| defaults::DEFAULT_UPLOAD_DIR.to_owned()),
            session: Session::resolve(partial.session)?,
            limits: Limits::resolve(partial.limits)?,
        })
    }

    /// Builds the server section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            address: env::string_or(env::SERVER_ADDRESS, defaults::DEFAULT_ADDRESS),
            port: env::number_or(env::SERVER_PORT, defaults::DEFAULT_SERVER_PORT),
            background: env::boolean(env::SERVER_BACKGROUND),
            log_to_file: env::boolean(env::SERVER_LOG_TO_FILE),
            certificate: env::string(env::SERVER_CERTIFICATE),
            key: env::string(env::SERVER_KEY),
            upload: env::string_or(env::SERVER_UPLOAD, defaults::DEFAULT_UPLOAD_DIR),
            session: Session::from_env(),
            limits: Limits::from_env(),
        }
    }
}

/// Configuration related to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The name of the session identifier in storage.
    pub key: String,
    /// The number of milliseconds the session stays active.
    pub max_age: u64,
}

impl Session {
    /// Resolves the session sub-section from an optional document slice.
    pub fn resolve(partial: Option<PartialSession>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        Ok(Self {
            key: partial
                .key
                .unwrap_or_else(|| defaults::DEFAULT_SESSION_KEY.to_owned()),
            max_age: resolve_size(
                "server.session.maxAge",
                partial.max_age,
                defaults::DEFAULT_SESSION_MAX_AGE,
            )?,
        })
    }

    /// Builds the session sub-section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            key: env::string_or(env::SERVER_SESSION_KEY, defaults::DEFAULT_SESSION_KEY),
            max_age: env::number_or(
                env::SERVER_SESSION_MAX_AGE,
                defaults::DEFAULT_SESSION_MAX_AGE,
            ),
        }
    }
}

/// Several server limit configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Minimum time between consecutive requests, in milliseconds.
    pub time_between_requests: u64,
    /// Maximum request body size, in bytes.
    pub maximum_request_size: u64,
    /// Maximum multipart field name size, in bytes.
    pub field_name_size: u64,
    /// Maximum multipart field value size, in bytes.
    pub field_size: u64,
    /// Maximum uploaded file size, in bytes.
    pub file_size: u64,
}

impl Limits {
    /// Resolves the limits sub-section from an optional document slice.
    pub fn resolve(partial: Option<PartialLimits>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        Ok(Self {
            time_between_requests: resolve_size(
                "server.limits.timeBetweenRequests",
                partial.time_between_requests,
                defaults::DEFAULT_TIME_BETWEEN_REQUESTS,
            )?,
            maximum_request_size: resolve_size(
                "server.limits.maximumRequestSize",
                partial.maximum_request_size,
                defaults::DEFAULT_MAXIMUM_REQUEST_SIZE,
            )?,
            field_name_size: resolve_size(
                "server.limits.fieldNameSize",
                partial.field_name_size,
                defaults::DEFAULT_FIELD_NAME_SIZE,
            )?,
            field_size: resolve_size(
                "server.limits.fieldSize",
                partial.field_size,
                defaults::DEFAULT_FIELD_SIZE,
            )?,
            file_size: resolve_size(
                "server.limits.fileSize",
                partial.file_size,
                defaults::DEFAULT_FILE_SIZE,
            )?,
        })
    }

    /// Builds the limits sub-section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            time_between_requests: env::number_or(
                env::SERVER_LIMIT_TIME_BETWEEN_REQUESTS,
                defaults::DEFAULT_TIME_BETWEEN_REQUESTS,
            ),
            maximum_request_size: env::number_or(
                env::SERVER_LIMIT_MAXIMUM_REQUEST_SIZE,
                defaults::DEFAULT_MAXIMUM_REQUEST_SIZE,
            ),
            field_name_size: env::number_or(
                env::SERVER_LIMIT_FIELD_NAME_SIZE,
                defaults::DEFAULT_FIELD_NAME_SIZE,
            ),
            field_size: env::number_or(env::SERVER_LIMIT_FIELD_SIZE, defaults::DEFAULT_FIELD_SIZE),
            file_size: env::number_or(env::SERVER_LIMIT_FILE_SIZE, defaults::DEFAULT_FILE_SIZE),
        }
    }
}

/// Supported database kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DatabaseKind {
    /// The only supported database engine.
    #[default]
    Postgres,
}

/// Definitions related to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// The database kind.
    pub kind: DatabaseKind,
    /// The database server location.
    pub host: String,
    /// The database port.
    pub port: u16,
    /// The database username.
    pub username: String,
    /// The database password.
    pub password: String,
    /// The name of the database to use.
    pub name: String,
}

impl Database {
    /// Resolves the database section from an optional document slice.
    pub fn resolve(partial: Option<PartialDatabase>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let kind = match partial.kind {
            Some(value) => DatabaseKind::from_str(&value).map_err(|_| {
                ConfigError::unsupported(format!("database.type '{value}' is not supported"))
            })?,
            None => DatabaseKind::default(),
        };
        Ok(Self {
            kind,
            host: partial
                .host
                .unwrap_or_else(|| defaults::DEFAULT_ADDRESS.to_owned()),
            port: resolve_port(
                "database.port",
                partial.port,
                1,
                defaults::DEFAULT_DATABASE_PORT,
            )?,
            username: partial
                .username
                .unwrap_or_else(|| defaults::DEFAULT_DATABASE_USERNAME.to_owned()),
            password: partial
                .password
                .unwrap_or_else(|| defaults::DEFAULT_DATABASE_PASSWORD.to_owned()),
            name: partial
                .name
                .unwrap_or_else(|| defaults::DEFAULT_DATABASE_NAME.to_owned()),
        })
    }

    /// Builds the database section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            kind: DatabaseKind::Postgres,
            host: env::string_or(env::DATABASE_HOST, defaults::DEFAULT_ADDRESS),
            port: env::number_or(env::DATABASE_PORT, defaults::DEFAULT_DATABASE_PORT),
            username: env::string_or(env::DATABASE_USERNAME, defaults::DEFAULT_DATABASE_USERNAME),
            password: env::string_or(env::DATABASE_PASSWORD, defaults::DEFAULT_DATABASE_PASSWORD),
            name: env::string_or(env::DATABASE_NAME, defaults::DEFAULT_DATABASE_NAME),
        }
    }
}

/// Definitions related to the cache server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    /// The cache server location.
    pub host: String,
    /// The cache server port.
    pub port: u16,
    /// The cache password, when authentication is required.
    pub password: Option<String>,
    /// TLS certificate; always paired with `key`.
    pub certificate: Option<String>,
    /// TLS private key; always paired with `certificate`.
    pub key: Option<String>,
}

impl Cache {
    /// Resolves the cache section from an optional document slice.
    pub fn resolve(partial: Option<PartialCache>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        if partial.certificate.is_some() != partial.key.is_some() {
            return Err(ConfigError::unsupported(
                "cache.certificate and cache.key must be set together",
            ));
        }
        Ok(Self {
            host: partial
                .host
                .unwrap_or_else(|| defaults::DEFAULT_ADDRESS.to_owned()),
            port: resolve_port("cache.port", partial.port, 1, defaults::DEFAULT_CACHE_PORT)?,
            password: partial.password,
            certificate: partial.certificate,
            key: partial.key,
        })
    }

    /// Builds the cache section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::string_or(env::CACHE_HOST, defaults::DEFAULT_ADDRESS),
            port: env::number_or(env::CACHE_PORT, defaults::DEFAULT_CACHE_PORT),
            password: env::string(env::CACHE_PASSWORD),
            certificate: env::string(env::CACHE_CERTIFICATE),
            key: env::string(env::CACHE_KEY),
        }
    }
}

/// Definitions related to service discovery registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Whether discovery registration is enabled.
    pub enabled: bool,
    /// The discovery agent location.
    pub host: String,
    /// The discovery agent port.
    pub port: u16,
    /// Whether a secure connection is required.
    pub secure: bool,
    /// Datacenter to register in; the agent's local one when unset.
    pub datacenter: Option<String>,
    /// Access token, when the agent requires one.
    pub token: Option<String>,
    /// Trusted certificates in PEM format.
    pub ca: Vec<String>,
}

impl Discovery {
    /// Resolves the discovery section from an optional document slice.
    pub fn resolve(partial: Option<PartialDiscovery>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        Ok(Self {
            enabled: partial.enabled.unwrap_or(false),
            host: partial
                .host
                .unwrap_or_else(|| defaults::DEFAULT_ADDRESS.to_owned()),
            port: resolve_port(
                "discovery.port",
                partial.port,
                1,
                defaults::DEFAULT_DISCOVERY_PORT,
            )?,
            secure: partial.secure.unwrap_or(false),
            datacenter: partial.datacenter,
            token: partial.token,
            ca: partial.ca.unwrap_or_default(),
        })
    }

    /// Builds the discovery section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            enabled: env::boolean(env::DISCOVERY_ENABLED),
            host: env::string_or(env::DISCOVERY_HOST, defaults::DEFAULT_ADDRESS),
            port: env::number_or(env::DISCOVERY_PORT, defaults::DEFAULT_DISCOVERY_PORT),
            secure: env::boolean(env::DISCOVERY_SECURE),
            datacenter: env::string(env::DISCOVERY_DATACENTER),
            token: env::string(env::DISCOVERY_TOKEN),
            ca: env::string(env::DISCOVERY_CA)
                .map(|pem| vec![pem])
                .unwrap_or_default(),
        }
    }
}

/// Definitions related to the remote log sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLog {
    /// Whether the remote log sink is enabled.
    pub enabled: bool,
    /// Account subdomain; present whenever the sink is enabled.
    pub subdomain: Option<String>,
    /// Access token; present whenever the sink is enabled.
    pub token: Option<String>,
    /// Account username; always paired with `password`.
    pub username: Option<String>,
    /// Account password; always paired with `username`.
    pub password: Option<String>,
}

impl RemoteLog {
    /// Resolves the remote log section from an optional document slice.
    pub fn resolve(partial: Option<PartialRemoteLog>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let enabled = partial.enabled.unwrap_or(false);
        if enabled && (partial.subdomain.is_none() || partial.token.is_none()) {
            return Err(ConfigError::unsupported(
                "remoteLog.enabled requires both remoteLog.subdomain and remoteLog.token",
            ));
        }
        if partial.username.is_some() != partial.password.is_some() {
            return Err(ConfigError::unsupported(
                "remoteLog.username and remoteLog.password must be set together",
            ));
        }
        Ok(Self {
            enabled,
            subdomain: partial.subdomain,
            token: partial.token,
            username: partial.username,
            password: partial.password,
        })
    }

    /// Builds the remote log section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            enabled: env::boolean(env::REMOTE_LOG_ENABLED),
            subdomain: env::string(env::REMOTE_LOG_SUBDOMAIN),
            token: env::string(env::REMOTE_LOG_TOKEN),
            username: env::string(env::REMOTE_LOG_USERNAME),
            password: env::string(env::REMOTE_LOG_PASSWORD),
        }
    }
}

/// Information about the SMTP server to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    /// The SMTP server address.
    pub address: String,
    /// The SMTP server port.
    pub port: u16,
    /// The SMTP username, when authentication is required.
    pub username: Option<String>,
    /// The SMTP password, when authentication is required.
    pub password: Option<String>,
    /// Whether a secure connection should be made.
    pub secure: bool,
    /// The sender address for outgoing mail.
    pub from: String,
}

impl Mail {
    /// Resolves the mail section from an optional document slice.
    pub fn resolve(partial: Option<PartialMail>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        Ok(Self {
            address: partial
                .address
                .unwrap_or_else(|| defaults::DEFAULT_ADDRESS.to_owned()),
            port: resolve_port("mail.port", partial.port, 1, defaults::DEFAULT_MAIL_PORT)?,
            username: partial.username,
            password: partial.password,
            secure: partial.secure.unwrap_or(false),
            from: partial
                .from
                .unwrap_or_else(|| defaults::DEFAULT_MAIL_FROM.to_owned()),
        })
    }

    /// Builds the mail section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            address: env::string_or(env::MAIL_ADDRESS, defaults::DEFAULT_ADDRESS),
            port: env::number_or(env::MAIL_PORT, defaults::DEFAULT_MAIL_PORT),
            username: env::string(env::MAIL_USERNAME),
            password: env::string(env::MAIL_PASSWORD),
            secure: env::boolean(env::MAIL_SECURE),
            from: env::string_or(env::MAIL_FROM, defaults::DEFAULT_MAIL_FROM),
        }
    }
}

/// Configuration of the management endpoint used to control the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Management {
    /// The address the management endpoint listens on.
    pub address: String,
    /// The port the management endpoint listens on; zero selects an
    /// ephemeral port.
    pub port: u16,
    /// The management username.
    pub username: String,
    /// The management password.
    pub password: String,
}

impl Management {
    /// Resolves the management section from an optional document slice.
    pub fn resolve(partial: Option<PartialManagement>) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        Ok(Self {
            address: partial
                .address
                .unwrap_or_else(|| defaults::DEFAULT_ADDRESS.to_owned()),
            port: resolve_port(
                "management.port",
                partial.port,
                0,
                defaults::DEFAULT_MANAGEMENT_PORT,
            )?,
            username: partial
                .username
                .unwrap_or_else(|| defaults::DEFAULT_MANAGEMENT_USERNAME.to_owned()),
            password: partial
                .password
                .unwrap_or_else(|| defaults::DEFAULT_MANAGEMENT_PASSWORD.to_owned()),
        })
    }

    /// Builds the management section purely from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            address: env::string_or(env::MANAGEMENT_ADDRESS, defaults::DEFAULT_ADDRESS),
            port: env::number_or(env::MANAGEMENT_PORT, defaults::DEFAULT_MANAGEMENT_PORT),
            username: env::string_or(
                env::MANAGEMENT_USERNAME,
                defaults::DEFAULT_MANAGEMENT_USERNAME,
            ),
            password: env::string_or(
                env::MANAGEMENT_PASSWORD,
                defaults::DEFAULT_MANAGEMENT_PASSWORD,
            ),
        }
    }
}

fn resolve_port(
    field: &str,
    value: Option<i64>,
    minimum: i64,
    default: u16,
) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(port) if port >= minimum => u16::try_from(port).map_err(|_| port_error(field, port)),
        Some(port) => Err(port_error(field, port)),
    }
}

fn port_error(field: &str, port: impl fmt::Display) -> ConfigError {
    ConfigError::unsupported(format!("{field} is out of range, got {port}"))
}

fn resolve_size(field: &str, value: Option<i64>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(number) => u64::try_from(number).map_err(|_| {
            ConfigError::unsupported(format!("{field} must be non-negative, got {number}"))
        }),
    }
}

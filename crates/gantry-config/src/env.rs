//! Environment variable names and lenient readers for the overlay source.
//!
//! The overlay never blocks process start: absent variables fall back to the
//! documented defaults, booleans are true only for the exact string `true`,
//! and numeric values that fail to parse yield the default rather than an
//! error.

use std::env;
use std::str::FromStr;

/// Server listen address.
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
/// Server listen port.
pub const SERVER_PORT: &str = "SERVER_PORT";
/// Whether the server should detach into the background.
pub const SERVER_BACKGROUND: &str = "SERVER_BACKGROUND";
/// Whether logging to a file is enabled.
pub const SERVER_LOG_TO_FILE: &str = "SERVER_LOG_TO_FILE";
/// Server TLS certificate.
pub const SERVER_CERTIFICATE: &str = "SERVER_CERTIFICATE";
/// Server TLS private key.
pub const SERVER_KEY: &str = "SERVER_KEY";
/// Upload directory.
pub const SERVER_UPLOAD: &str = "SERVER_UPLOAD";
/// Session identifier name.
pub const SERVER_SESSION_KEY: &str = "SERVER_SESSION_KEY";
/// Session lifetime in milliseconds.
pub const SERVER_SESSION_MAX_AGE: &str = "SERVER_SESSION_MAX_AGE";
/// Minimum time between consecutive requests.
pub const SERVER_LIMIT_TIME_BETWEEN_REQUESTS: &str = "SERVER_LIMIT_TIME_BETWEEN_REQUESTS";
/// Maximum request body size.
pub const SERVER_LIMIT_MAXIMUM_REQUEST_SIZE: &str = "SERVER_LIMIT_MAXIMUM_REQUEST_SIZE";
/// Maximum multipart field name size.
pub const SERVER_LIMIT_FIELD_NAME_SIZE: &str = "SERVER_LIMIT_FIELD_NAME_SIZE";
/// Maximum multipart field value size.
pub const SERVER_LIMIT_FIELD_SIZE: &str = "SERVER_LIMIT_FIELD_SIZE";
/// Maximum uploaded file size.
pub const SERVER_LIMIT_FILE_SIZE: &str = "SERVER_LIMIT_FILE_SIZE";
/// Database host.
pub const DATABASE_HOST: &str = "DATABASE_HOST";
/// Database port.
pub const DATABASE_PORT: &str = "DATABASE_PORT";
/// Database name.
pub const DATABASE_NAME: &str = "DATABASE_NAME";
/// Database username.
pub const DATABASE_USERNAME: &str = "DATABASE_USERNAME";
/// Database password.
pub const DATABASE_PASSWORD: &str = "DATABASE_PASSWORD";
/// Cache host.
pub const CACHE_HOST: &str = "CACHE_HOST";
/// Cache port.
pub const CACHE_PORT: &str = "CACHE_PORT";
/// Cache password.
pub const CACHE_PASSWORD: &str = "CACHE_PASSWORD";
/// Cache TLS certificate.
pub const CACHE_CERTIFICATE: &str = "CACHE_CERTIFICATE";
/// Cache TLS private key.
pub const CACHE_KEY: &str = "CACHE_KEY";
/// Whether discovery registration is enabled.
pub const DISCOVERY_ENABLED: &str = "DISCOVERY_ENABLED";
/// Discovery agent host.
pub const DISCOVERY_HOST: &str = "DISCOVERY_HOST";
/// Discovery agent port.
pub const DISCOVERY_PORT: &str = "DISCOVERY_PORT";
/// Whether the discovery connection must be secure.
pub const DISCOVERY_SECURE: &str = "DISCOVERY_SECURE";
/// Discovery datacenter.
pub const DISCOVERY_DATACENTER: &str = "DISCOVERY_DATACENTER";
/// Discovery token.
pub const DISCOVERY_TOKEN: &str = "DISCOVERY_TOKEN";
/// Single trusted certificate for discovery, PEM format.
pub const DISCOVERY_CA: &str = "DISCOVERY_CA";
/// Whether the remote log sink is enabled.
pub const REMOTE_LOG_ENABLED: &str = "REMOTE_LOG_ENABLED";
/// Remote log subdomain.
pub const REMOTE_LOG_SUBDOMAIN: &str = "REMOTE_LOG_SUBDOMAIN";
/// Remote log token.
pub const REMOTE_LOG_TOKEN: &str = "REMOTE_LOG_TOKEN";
/// Remote log username.
pub const REMOTE_LOG_USERNAME: &str = "REMOTE_LOG_USERNAME";
/// Remote log password.
pub const REMOTE_LOG_PASSWORD: &str = "REMOTE_LOG_PASSWORD";
/// SMTP server address.
pub const MAIL_ADDRESS: &str = "MAIL_ADDRESS";
/// SMTP server port.
pub const MAIL_PORT: &str = "MAIL_PORT";
/// SMTP username.
pub const MAIL_USERNAME: &str = "MAIL_USERNAME";
/// SMTP password.
pub const MAIL_PASSWORD: &str = "MAIL_PASSWORD";
/// Whether mail delivery must use a secure connection.
pub const MAIL_SECURE: &str = "MAIL_SECURE";
/// Sender address for outgoing mail.
pub const MAIL_FROM: &str = "MAIL_FROM";
/// Management listen address.
pub const MANAGEMENT_ADDRESS: &str = "MANAGEMENT_ADDRESS";
/// Management listen port.
pub const MANAGEMENT_PORT: &str = "MANAGEMENT_PORT";
/// Management username.
pub const MANAGEMENT_USERNAME: &str = "MANAGEMENT_USERNAME";
/// Management password.
pub const MANAGEMENT_PASSWORD: &str = "MANAGEMENT_PASSWORD";

/// Reads a string variable, treating absence as unset.
pub(crate) fn string(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Reads a string variable or falls back to the supplied default.
pub(crate) fn string_or(name: &str, default: &str) -> String {
    string(name).unwrap_or_else(|| default.to_owned())
}

/// A boolean variable is true only when its value is exactly `true`.
pub(crate) fn boolean(name: &str) -> bool {
    string(name).is_some_and(|value| value == "true")
}

/// Parses a numeric variable; absent or malformed values yield the default.
pub(crate) fn number_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
{
    string(name)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

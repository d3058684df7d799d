//! Documented defaults applied while resolving configuration sections.
//!
//! Every field in the configuration tree has either an explicit value or one
//! of these defaults; no field is ever left unset after resolution. The
//! constants are shared by the file path and the environment overlay so both
//! sources agree on fallback values.

/// Loopback address used as the default bind/peer host throughout.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1";

/// Default server port; zero requests an ephemeral port from the OS.
pub const DEFAULT_SERVER_PORT: u16 = 0;

/// Default directory for uploaded files.
pub const DEFAULT_UPLOAD_DIR: &str = "./upload";

/// Default name of the session identifier in storage.
pub const DEFAULT_SESSION_KEY: &str = "KSESSION";

/// Default session lifetime in milliseconds.
pub const DEFAULT_SESSION_MAX_AGE: u64 = 1_800_000;

/// Default minimum time between consecutive requests, in milliseconds.
pub const DEFAULT_TIME_BETWEEN_REQUESTS: u64 = 10_000;

/// Default maximum request body size, in bytes.
pub const DEFAULT_MAXIMUM_REQUEST_SIZE: u64 = 52_428_800;

/// Default maximum multipart field name size, in bytes.
pub const DEFAULT_FIELD_NAME_SIZE: u64 = 100;

/// Default maximum multipart field value size, in bytes.
pub const DEFAULT_FIELD_SIZE: u64 = 1_048_576;

/// Default maximum uploaded file size, in bytes.
pub const DEFAULT_FILE_SIZE: u64 = 20_971_520;

/// Default database port.
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "projects";

/// Default database username.
pub const DEFAULT_DATABASE_USERNAME: &str = "projects";

/// Default database password.
pub const DEFAULT_DATABASE_PASSWORD: &str = "projects123";

/// Default cache server port.
pub const DEFAULT_CACHE_PORT: u16 = 6379;

/// Default discovery agent port.
pub const DEFAULT_DISCOVERY_PORT: u16 = 8500;

/// Default SMTP server port.
pub const DEFAULT_MAIL_PORT: u16 = 654;

/// Default sender address for outgoing mail.
pub const DEFAULT_MAIL_FROM: &str = "admin@example.com";

/// Default management port; zero requests an ephemeral port from the OS.
pub const DEFAULT_MANAGEMENT_PORT: u16 = 0;

/// Default management username.
pub const DEFAULT_MANAGEMENT_USERNAME: &str = "admin";

/// Default management password.
pub const DEFAULT_MANAGEMENT_PASSWORD: &str = "admin123";

//! End-to-end resolution: source precedence, format handling, and the
//! environment overlay.
//!
//! These tests mutate the process environment and working directory, so they
//! all serialise on one lock and restore what they touched.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use rstest::rstest;
use tempfile::TempDir;

use gantry_config::{Config, ConfigError, defaults, env as vars, resolve};

fn process_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Scoped environment and working-directory overrides, restored on drop.
struct Harness {
    _guard: MutexGuard<'static, ()>,
    temp_dir: TempDir,
    previous_dir: PathBuf,
    overrides: Vec<(String, Option<std::ffi::OsString>)>,
}

impl Harness {
    fn new() -> Self {
        let guard = process_lock();
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let previous_dir = std::env::current_dir().expect("cwd should be readable");
        std::env::set_current_dir(temp_dir.path()).expect("cwd should change");
        Self {
            _guard: guard,
            temp_dir,
            previous_dir,
            overrides: Vec::new(),
        }
    }

    fn set_env(&mut self, key: &str, value: &str) {
        self.overrides.push((key.to_owned(), std::env::var_os(key)));
        // Safe under the process lock: no other test observes the mutation.
        unsafe { std::env::set_var(key, value) };
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("fixture should be written");
        path
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        while let Some((key, previous)) = self.overrides.pop() {
            match previous {
                Some(value) => unsafe { std::env::set_var(&key, value) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
        let _ = std::env::set_current_dir(&self.previous_dir);
    }
}

#[rstest]
#[case::json("minimal.json", "{}")]
#[case::yaml("minimal.yaml", "")]
#[case::toml("minimal.toml", "")]
fn minimal_document_yields_all_defaults(#[case] name: &str, #[case] contents: &str) {
    let harness = Harness::new();
    let path = harness.write(name, contents);
    let config = resolve(Some(&path)).expect("minimal document should resolve");
    assert_eq!(config, Config::default());
}

#[rstest]
#[case::json("broken.json", r#"{"server":{"port":70000}}"#)]
#[case::yaml("broken.yaml", "server:\n  port: 70000\n")]
#[case::toml("broken.toml", "[server]\nport = 70000\n")]
fn out_of_range_port_rejects_every_format(#[case] name: &str, #[case] contents: &str) {
    let harness = Harness::new();
    let path = harness.write(name, contents);
    let error = resolve(Some(&path)).expect_err("out-of-range port should fail");
    assert!(matches!(error, ConfigError::FormatNotSupported { .. }));
}

#[test]
fn fully_specified_document_preserves_every_value() {
    let harness = Harness::new();
    let path = harness.write(
        "full.json",
        r#"{
            "server": {
                "address": "10.0.0.1",
                "port": 8443,
                "background": false,
                "logToFile": true,
                "certificate": "cert.pem",
                "key": "key.pem",
                "upload": "/srv/upload",
                "session": {"key": "SID", "maxAge": 60000},
                "limits": {
                    "timeBetweenRequests": 5,
                    "maximumRequestSize": 1024,
                    "fieldNameSize": 64,
                    "fieldSize": 512,
                    "fileSize": 2048
                }
            },
            "database": {
                "type": "postgres",
                "host": "db.internal",
                "port": 6543,
                "username": "svc",
                "password": "secret",
                "name": "app"
            },
            "cache": {"host": "cache.internal", "port": 6380, "password": "hush"},
            "discovery": {
                "enabled": true,
                "host": "consul.internal",
                "port": 8501,
                "secure": true,
                "datacenter": "dc1",
                "token": "tok",
                "ca": ["pem-one"]
            },
            "remoteLog": {
                "enabled": true,
                "subdomain": "ops",
                "token": "rl-token",
                "username": "rl-user",
                "password": "rl-pass"
            },
            "mail": {
                "address": "smtp.internal",
                "port": 587,
                "username": "mailer",
                "password": "mail-pass",
                "secure": true,
                "from": "noreply@example.com"
            },
            "management": {
                "address": "127.0.0.2",
                "port": 9000,
                "username": "root",
                "password": "hunter2"
            }
        }"#,
    );
    let config = resolve(Some(&path)).expect("full document should resolve");
    assert_eq!(config.server.address, "10.0.0.1");
    assert_eq!(config.server.port, 8443);
    assert!(!config.server.background);
    assert!(config.server.log_to_file);
    assert_eq!(config.server.certificate.as_deref(), Some("cert.pem"));
    assert_eq!(config.server.session.key, "SID");
    assert_eq!(config.server.session.max_age, 60_000);
    assert_eq!(config.server.limits.field_size, 512);
    assert_eq!(config.database.host, "db.internal");
    assert_eq!(config.database.port, 6543);
    assert_eq!(config.cache.password.as_deref(), Some("hush"));
    assert!(config.discovery.enabled);
    assert_eq!(config.discovery.ca, vec!["pem-one".to_owned()]);
    assert!(config.remote_log.enabled);
    assert_eq!(config.remote_log.subdomain.as_deref(), Some("ops"));
    assert_eq!(config.mail.from, "noreply@example.com");
    assert_eq!(config.management.port, 9000);
}

#[test]
fn partial_session_keeps_documented_default_for_key() {
    let harness = Harness::new();
    let path = harness.write(
        "session.json",
        r#"{"server":{"session":{"maxAge":1800001}}}"#,
    );
    let config = resolve(Some(&path)).expect("document should resolve");
    assert_eq!(config.server.session.max_age, 1_800_001);
    assert_eq!(
        config.server.session.key,
        defaults::DEFAULT_SESSION_KEY,
        "absent sibling field should keep its default"
    );
}

#[test]
fn explicit_path_beats_local_config_file() {
    let harness = Harness::new();
    harness.write("config.json", r#"{"server":{"port":1111}}"#);
    let explicit = harness.write("other.json", r#"{"server":{"port":2222}}"#);
    let config = resolve(Some(&explicit)).expect("explicit path should resolve");
    assert_eq!(config.server.port, 2222);
}

#[test]
fn local_config_file_is_used_when_explicit_path_is_missing() {
    let harness = Harness::new();
    harness.write("config.json", r#"{"server":{"port":1111}}"#);
    let config =
        resolve(Some(Path::new("does-not-exist.json"))).expect("local file should resolve");
    assert_eq!(config.server.port, 1111);
}

#[test]
fn located_file_that_fails_validation_never_falls_back_to_environment() {
    let mut harness = Harness::new();
    harness.set_env(vars::SERVER_PORT, "4321");
    let path = harness.write("bad.json", r#"{"server":{"bogus":true}}"#);
    let error = resolve(Some(&path)).expect_err("invalid located file must abort");
    assert!(matches!(error, ConfigError::FormatNotSupported { .. }));
}

#[test]
fn environment_alone_populates_the_configuration() {
    let mut harness = Harness::new();
    harness.set_env(vars::DATABASE_HOST, "db.env");
    harness.set_env(vars::DATABASE_PORT, "6001");
    harness.set_env(vars::DISCOVERY_ENABLED, "true");
    harness.set_env(vars::SERVER_SESSION_KEY, "ENVSESSION");
    let config = resolve(None).expect("environment resolution never fails");
    assert_eq!(config.database.host, "db.env");
    assert_eq!(config.database.port, 6001);
    assert!(config.discovery.enabled);
    assert_eq!(config.server.session.key, "ENVSESSION");
    // Everything untouched keeps its default.
    assert_eq!(config.cache.port, defaults::DEFAULT_CACHE_PORT);
}

#[test]
fn malformed_environment_values_fall_back_to_defaults() {
    let mut harness = Harness::new();
    harness.set_env(vars::DATABASE_PORT, "not-a-number");
    harness.set_env(vars::DISCOVERY_ENABLED, "TRUE");
    harness.set_env(vars::MAIL_SECURE, "yes");
    let config = resolve(None).expect("environment resolution never fails");
    assert_eq!(config.database.port, defaults::DEFAULT_DATABASE_PORT);
    assert!(!config.discovery.enabled, "only the exact string 'true' enables");
    assert!(!config.mail.secure);
}

#[test]
fn unset_boolean_variables_default_to_false() {
    let harness = Harness::new();
    let config = resolve(None).expect("environment resolution never fails");
    assert!(!config.discovery.enabled);
    assert!(!config.remote_log.enabled);
    assert!(!config.server.log_to_file);
    drop(harness);
}

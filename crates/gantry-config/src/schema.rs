//! Document-level schema rules checked before building a configuration.
//!
//! Serde already enforces the closed-schema and type rules while parsing, so
//! this pass covers what remains: numeric ranges and cross-field
//! dependencies. Unlike the fail-fast checks run during section resolution,
//! this pass walks the whole document and reports every violation it finds,
//! so an operator can fix a broken file in one round trip. JSON documents go
//! through both layers; the two checks are independent and must both pass.

use crate::partial::{
    PartialCache, PartialConfig, PartialDatabase, PartialDiscovery, PartialLimits, PartialMail,
    PartialManagement, PartialRemoteLog, PartialServer, PartialSession,
};

/// Lowest port accepted by sections that must name a live peer.
const MIN_PEER_PORT: i64 = 1;
/// Highest valid TCP port.
const MAX_PORT: i64 = 65_535;

/// Collects every schema violation in the document.
///
/// An empty result means the document passes the range and dependency rules;
/// the section constructors still re-validate their own slices afterwards.
pub(crate) fn violations(config: &PartialConfig) -> Vec<String> {
    let mut found = Vec::new();
    if let Some(server) = &config.server {
        check_server(server, &mut found);
    }
    if let Some(database) = &config.database {
        check_database(database, &mut found);
    }
    if let Some(cache) = &config.cache {
        check_cache(cache, &mut found);
    }
    if let Some(discovery) = &config.discovery {
        check_discovery(discovery, &mut found);
    }
    if let Some(remote_log) = &config.remote_log {
        check_remote_log(remote_log, &mut found);
    }
    if let Some(mail) = &config.mail {
        check_mail(mail, &mut found);
    }
    if let Some(management) = &config.management {
        check_management(management, &mut found);
    }
    found
}

fn check_server(server: &PartialServer, found: &mut Vec<String>) {
    check_port("server.port", server.port, 0, found);
    check_pair(
        "server",
        server.certificate.as_deref(),
        server.key.as_deref(),
        found,
    );
    if let Some(session) = &server.session {
        check_session(session, found);
    }
    if let Some(limits) = &server.limits {
        check_limits(limits, found);
    }
}

fn check_session(session: &PartialSession, found: &mut Vec<String>) {
    check_non_negative("server.session.maxAge", session.max_age, found);
}

fn check_limits(limits: &PartialLimits, found: &mut Vec<String>) {
    check_non_negative(
        "server.limits.timeBetweenRequests",
        limits.time_between_requests,
        found,
    );
    check_non_negative(
        "server.limits.maximumRequestSize",
        limits.maximum_request_size,
        found,
    );
    check_non_negative("server.limits.fieldNameSize", limits.field_name_size, found);
    check_non_negative("server.limits.fieldSize", limits.field_size, found);
    check_non_negative("server.limits.fileSize", limits.file_size, found);
}

fn check_database(database: &PartialDatabase, found: &mut Vec<String>) {
    if let Some(kind) = &database.kind
        && kind != "postgres"
    {
        found.push(format!("database.type '{kind}' is not supported"));
    }
    check_port("database.port", database.port, MIN_PEER_PORT, found);
}

fn check_cache(cache: &PartialCache, found: &mut Vec<String>) {
    check_port("cache.port", cache.port, MIN_PEER_PORT, found);
    check_pair(
        "cache",
        cache.certificate.as_deref(),
        cache.key.as_deref(),
        found,
    );
}

fn check_discovery(discovery: &PartialDiscovery, found: &mut Vec<String>) {
    check_port("discovery.port", discovery.port, MIN_PEER_PORT, found);
}

fn check_remote_log(remote_log: &PartialRemoteLog, found: &mut Vec<String>) {
    if remote_log.enabled == Some(true)
        && (remote_log.subdomain.is_none() || remote_log.token.is_none())
    {
        found.push(
            "remoteLog.enabled requires both remoteLog.subdomain and remoteLog.token".into(),
        );
    }
    if remote_log.username.is_some() != remote_log.password.is_some() {
        found.push("remoteLog.username and remoteLog.password must be set together".into());
    }
}

fn check_mail(mail: &PartialMail, found: &mut Vec<String>) {
    check_port("mail.port", mail.port, MIN_PEER_PORT, found);
}

fn check_management(management: &PartialManagement, found: &mut Vec<String>) {
    check_port("management.port", management.port, 0, found);
}

fn check_port(field: &str, value: Option<i64>, minimum: i64, found: &mut Vec<String>) {
    if let Some(port) = value
        && !(minimum..=MAX_PORT).contains(&port)
    {
        found.push(format!(
            "{field} must be between {minimum} and {MAX_PORT}, got {port}"
        ));
    }
}

fn check_non_negative(field: &str, value: Option<i64>, found: &mut Vec<String>) {
    if let Some(number) = value
        && number < 0
    {
        found.push(format!("{field} must be non-negative, got {number}"));
    }
}

fn check_pair(
    section: &str,
    certificate: Option<&str>,
    key: Option<&str>,
    found: &mut Vec<String>,
) {
    if certificate.is_some() != key.is_some() {
        found.push(format!(
            "{section}.certificate and {section}.key must be set together"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_no_violations() {
        assert!(violations(&PartialConfig::default()).is_empty());
    }

    #[test]
    fn reports_every_violation_found() {
        let document = PartialConfig {
            server: Some(PartialServer {
                port: Some(70_000),
                certificate: Some("cert.pem".into()),
                ..PartialServer::default()
            }),
            database: Some(PartialDatabase {
                port: Some(0),
                ..PartialDatabase::default()
            }),
            ..PartialConfig::default()
        };
        let found = violations(&document);
        assert_eq!(found.len(), 3, "expected three violations: {found:?}");
    }

    #[test]
    fn remote_log_enabled_requires_subdomain_and_token() {
        let document = PartialConfig {
            remote_log: Some(PartialRemoteLog {
                enabled: Some(true),
                subdomain: Some("ops".into()),
                ..PartialRemoteLog::default()
            }),
            ..PartialConfig::default()
        };
        assert_eq!(violations(&document).len(), 1);
    }

    #[test]
    fn negative_limits_are_rejected() {
        let document = PartialConfig {
            server: Some(PartialServer {
                limits: Some(PartialLimits {
                    file_size: Some(-1),
                    ..PartialLimits::default()
                }),
                ..PartialServer::default()
            }),
            ..PartialConfig::default()
        };
        assert_eq!(violations(&document).len(), 1);
    }
}

use std::sync::OnceLock;

use regex::Regex;

static SECRET_PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

/// Why a psql invocation against the target database failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionErrorKind {
    PsqlNotFound,
    HostUnreachable,
    ConnectionRefused,
    AuthFailed,
    DatabaseNotFound,
    PermissionDenied,
    Timeout,
    #[default]
    Unknown,
}

const CLASSIFIERS: &[(ConnectionErrorKind, &[&str])] = &[
    (
        ConnectionErrorKind::PsqlNotFound,
        &["command not found", "not found: psql", "not recognized", "no such file or directory"],
    ),
    (
        ConnectionErrorKind::HostUnreachable,
        &[
            "could not translate host name",
            "name or service not known",
            "nodename nor servname provided",
            "no such host",
        ],
    ),
    (ConnectionErrorKind::ConnectionRefused, &["connection refused"]),
    (
        ConnectionErrorKind::AuthFailed,
        &["password authentication failed", "authentication failed", "no password supplied"],
    ),
    (ConnectionErrorKind::PermissionDenied, &["permission denied"]),
    (ConnectionErrorKind::Timeout, &["timeout expired", "timed out"]),
];

impl ConnectionErrorKind {
    pub fn classify(stderr: &str) -> Self {
        let lower = stderr.to_lowercase();

        // "database ... does not exist" must win over the generic patterns below it.
        if lower.contains("does not exist") && lower.contains("database") {
            return Self::DatabaseNotFound;
        }

        CLASSIFIERS
            .iter()
            .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
            .map_or(Self::Unknown, |(kind, _)| *kind)
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::PsqlNotFound => "psql command not found",
            Self::HostUnreachable => "Could not resolve host",
            Self::ConnectionRefused => "Connection refused",
            Self::AuthFailed => "Authentication failed",
            Self::DatabaseNotFound => "Database does not exist",
            Self::PermissionDenied => "Catalog access denied",
            Self::Timeout => "Connection timed out",
            Self::Unknown => "Schema introspection failed",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::PsqlNotFound => "Install PostgreSQL client tools or add psql to PATH",
            Self::HostUnreachable => "Check the hostname in the DSN",
            Self::ConnectionRefused => "Check that the server is running and the port is right",
            Self::AuthFailed => "Check username and password",
            Self::DatabaseNotFound => "Check the database name in the DSN",
            Self::PermissionDenied => "The role needs read access to pg_catalog",
            Self::Timeout => "Check network connectivity or raise [introspection].timeout_secs",
            Self::Unknown => "See the log file for details",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionErrorInfo {
    pub kind: ConnectionErrorKind,
    pub masked_details: String,
}

impl ConnectionErrorInfo {
    /// Classifies psql stderr and keeps only a password-masked copy of it.
    pub fn new(raw_stderr: &str) -> Self {
        Self {
            kind: ConnectionErrorKind::classify(raw_stderr),
            masked_details: mask_secrets(raw_stderr),
        }
    }

    pub fn with_kind(kind: ConnectionErrorKind, raw_stderr: &str) -> Self {
        Self {
            kind,
            masked_details: mask_secrets(raw_stderr),
        }
    }

    pub fn summary(&self) -> &'static str {
        self.kind.summary()
    }

    pub fn hint(&self) -> &'static str {
        self.kind.hint()
    }
}

/// Masks passwords in DSNs, `password=` parameters and `PGPASSWORD=` assignments.
pub fn mask_secrets(text: &str) -> String {
    let patterns = SECRET_PATTERNS.get_or_init(|| {
        vec![
            (
                Regex::new(r"(?i)(postgres(?:ql)?://[^:/@\s]+:)[^@\s]+(@)").unwrap(),
                "${1}****${2}",
            ),
            (Regex::new(r"(?i)(password=)[^\s]+").unwrap(), "${1}****"),
            (Regex::new(r"(PGPASSWORD=)[^\s]+").unwrap(), "${1}****"),
        ]
    });

    patterns
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

// Error types for cert-checker
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0
//
// Structured error types using thiserror. Reading and extraction failures are
// kept apart from delivery failures so callers can decide which ones are
// fatal and which ones become alerts.

use chrono::{DateTime, Utc};
use std::io;
use thiserror::Error;

/// Main error type for cert-checker operations
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Credential file could not be read
    #[error("Unable to read {path}: {source}")]
    CredentialIo {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Credential file was read but its contents are malformed
    #[error("Malformed credential {path}: {details}")]
    CredentialFormat { path: String, details: String },

    /// No credential path was supplied
    #[error("Missing credential: {what}")]
    CredentialMissing { what: String },

    /// A keytab entry is past its derived expiration
    #[error("keytab {path} has expired, it was created on {created_at}")]
    Expired {
        path: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        principal: Option<String>,
    },

    /// Alert could not be delivered through a channel
    #[error("Failed to deliver alert via {channel}: {details}")]
    Delivery { channel: String, details: String },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Generic I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Gauge registration or exposition encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl CheckerError {
    /// Whether this error reports an expired credential.
    ///
    /// Errors bubbling up from the certificate loaders are only known by their
    /// text, so any message mentioning "expired" counts as well.
    pub fn is_expiry(&self) -> bool {
        matches!(self, CheckerError::Expired { .. }) || self.to_string().contains("expired")
    }

    pub(crate) fn format(path: impl Into<String>, details: impl Into<String>) -> Self {
        CheckerError::CredentialFormat {
            path: path.into(),
            details: details.into(),
        }
    }

    pub(crate) fn delivery(channel: &str, details: impl Into<String>) -> Self {
        CheckerError::Delivery {
            channel: channel.to_string(),
            details: details.into(),
        }
    }
}

impl From<tokio::task::JoinError> for CheckerError {
    fn from(err: tokio::task::JoinError) -> Self {
        CheckerError::Other(format!("Task join error: {}", err))
    }
}

impl From<lettre::address::AddressError> for CheckerError {
    fn from(err: lettre::address::AddressError) -> Self {
        CheckerError::delivery("email", format!("Email address error: {}", err))
    }
}

impl From<lettre::error::Error> for CheckerError {
    fn from(err: lettre::error::Error) -> Self {
        CheckerError::delivery("email", format!("Email error: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for CheckerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        CheckerError::delivery("email", format!("SMTP error: {}", err))
    }
}

impl From<reqwest::Error> for CheckerError {
    fn from(err: reqwest::Error) -> Self {
        CheckerError::delivery("webhook", format!("HTTP request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_error_message() {
        let created = DateTime::from_timestamp(1_600_000_000, 0).unwrap();
        let err = CheckerError::Expired {
            path: "/etc/krb5.keytab".to_string(),
            created_at: created,
            expires_at: created,
            principal: Some("host,node01".to_string()),
        };

        let msg = err.to_string();
        assert!(msg.contains("expired"));
        assert!(msg.contains("/etc/krb5.keytab"));
        assert!(err.is_expiry());
    }

    #[test]
    fn test_is_expiry_from_message_text() {
        let err = CheckerError::Other("certificate has expired or is not yet valid".to_string());
        assert!(err.is_expiry());

        let err = CheckerError::format("cert.pem", "no certificates found");
        assert!(!err.is_expiry());
    }

    #[test]
    fn test_error_conversion_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CheckerError = io_err.into();

        assert!(matches!(err, CheckerError::Io { .. }));
    }

    #[test]
    fn test_error_chain_preserved() {
        use std::error::Error;

        let err = CheckerError::CredentialIo {
            path: "missing.pem".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing.pem"));
    }
}

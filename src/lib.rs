// cert-checker - expiry checks for X.509 certificates, proxies and Kerberos keytabs
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! cert-checker reads a credential (PEM certificate and key, X.509 proxy or
//! keytab), works out when it stops being usable and either raises an alert
//! through email or a webhook, or exposes the remaining lifetime as a
//! Prometheus gauge.

pub mod api;
pub mod cli;
pub mod credentials;
pub mod error;
pub mod expiry;
pub mod metrics;
pub mod monitor;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::credentials::{Credential, CredentialReader, CredentialSource};
pub use crate::error::CheckerError;
pub use crate::expiry::{ExpiryExtractor, Verdict};
pub use crate::monitor::{AlertDispatcher, Checker};

/// Result type for cert-checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;

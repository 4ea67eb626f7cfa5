// Expiry Extractor - definitive valid-until instant for each credential kind
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::{CertificateBundle, Credential, Keytab};
use crate::error::CheckerError;
use chrono::{DateTime, TimeDelta, Utc};
use x509_parser::prelude::*;

/// Lifetime assumed for keytab accounts, which carry no expiry of their own
pub const ASSUMED_KEYTAB_VALIDITY_SECS: i64 = 365 * 24 * 60 * 60;

/// Largest lookahead accepted in either direction (100 years)
pub const MAX_LOOKAHEAD_SECS: i64 = 100 * ASSUMED_KEYTAB_VALIDITY_SECS;

/// Expiration instant and the name it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialExpiry {
    pub expires_at: DateTime<Utc>,
    /// Certificate common name or keytab principal
    pub label: String,
}

/// Computes expiry instants; the lookahead only affects keytabs
#[derive(Debug, Clone, Copy)]
pub struct ExpiryExtractor {
    lookahead_secs: i64,
}

impl ExpiryExtractor {
    pub fn new(lookahead_secs: i64) -> Self {
        Self { lookahead_secs }
    }

    pub fn lookahead(&self) -> Result<TimeDelta> {
        TimeDelta::try_seconds(self.lookahead_secs).ok_or_else(|| CheckerError::Config {
            message: format!("lookahead of {} seconds is out of range", self.lookahead_secs),
        })
    }

    pub fn extract(&self, credential: &Credential, now: DateTime<Utc>) -> Result<CredentialExpiry> {
        match credential {
            Credential::CertificateKeyPair(bundle) | Credential::X509Proxy(bundle) => {
                Self::certificate_expiry(bundle)
            }
            Credential::Keytab(keytab) => self.keytab_expiry(keytab, now),
        }
    }

    /// Not-after and common name of the first certificate in the chain that parses
    pub fn certificate_expiry(bundle: &CertificateBundle) -> Result<CredentialExpiry> {
        for der in &bundle.chain {
            match X509Certificate::from_der(der.as_ref()) {
                Ok((_, cert)) => {
                    let not_after = cert.validity().not_after.timestamp();
                    let expires_at = DateTime::from_timestamp(not_after, 0).ok_or_else(|| {
                        CheckerError::format(
                            bundle.path.as_str(),
                            format!("not-after {} out of range", not_after),
                        )
                    })?;

                    let common_name = cert
                        .subject()
                        .iter_common_name()
                        .next()
                        .and_then(|cn| cn.as_str().ok())
                        .unwrap_or_default()
                        .replace('\n', "");

                    return Ok(CredentialExpiry {
                        expires_at,
                        label: common_name,
                    });
                }
                Err(e) => {
                    tracing::debug!("Skipping unparsable certificate in {}: {}", bundle.path, e);
                }
            }
        }

        Err(CheckerError::format(
            bundle.path.as_str(),
            "no parsable certificate in chain",
        ))
    }

    /// Derived expiry of a keytab
    ///
    /// Each entry expires at `created + one year - lookahead`. The first entry
    /// already past that point fails the whole keytab; otherwise the value of
    /// the last entry in file order is returned.
    pub fn keytab_expiry(&self, keytab: &Keytab, now: DateTime<Utc>) -> Result<CredentialExpiry> {
        let offset = ASSUMED_KEYTAB_VALIDITY_SECS
            .checked_sub(self.lookahead_secs)
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| CheckerError::Config {
                message: format!("lookahead of {} seconds is out of range", self.lookahead_secs),
            })?;
        let mut last = None;

        for entry in &keytab.entries {
            let principal = entry.principal.label();
            let expires_at = entry.timestamp.checked_add_signed(offset).ok_or_else(|| {
                CheckerError::Config {
                    message: format!(
                        "lookahead of {} seconds moves the expiry of {} out of range",
                        self.lookahead_secs, keytab.path
                    ),
                }
            })?;

            tracing::debug!(
                "keytab entry {} created {} expires {} principal {}",
                keytab.path,
                entry.timestamp,
                expires_at,
                principal
            );

            if expires_at < now {
                return Err(CheckerError::Expired {
                    path: keytab.path.clone(),
                    created_at: entry.timestamp,
                    expires_at,
                    principal: Some(principal),
                });
            }

            last = Some(CredentialExpiry {
                expires_at,
                label: principal,
            });
        }

        last.ok_or_else(|| CheckerError::format(keytab.path.as_str(), "keytab contains no entries"))
    }
}

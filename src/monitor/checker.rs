// Credential Checker - read, evaluate and alert in one pass
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::{CredentialKind, CredentialReader, CredentialSource};
use crate::error::CheckerError;
use crate::expiry::{ExpiryExtractor, Verdict, evaluate, evaluate_keytab};
use crate::monitor::alerts::AlertDispatcher;
use chrono::{DateTime, Utc};

/// Settings shared by every check
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Lookahead window in seconds
    pub lookahead_secs: i64,
    /// Email address list or webhook URL
    pub alert_target: String,
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub verdict: Verdict,
    /// Common name or principal, when known
    pub label: Option<String>,
    /// Whether an alert was dispatched
    pub alerted: bool,
}

pub struct Checker {
    reader: CredentialReader,
    extractor: ExpiryExtractor,
    dispatcher: AlertDispatcher,
    settings: CheckSettings,
}

impl Checker {
    pub fn new(reader: CredentialReader, dispatcher: AlertDispatcher, settings: CheckSettings) -> Self {
        Self {
            reader,
            extractor: ExpiryExtractor::new(settings.lookahead_secs),
            dispatcher,
            settings,
        }
    }

    pub async fn check(&self, source: &CredentialSource) -> Result<CheckReport> {
        self.check_at(source, Utc::now()).await
    }

    /// Check `source` as of `now`
    ///
    /// Violations dispatch exactly one alert. Reading errors other than an
    /// expired credential are returned, as are delivery failures.
    pub async fn check_at(
        &self,
        source: &CredentialSource,
        now: DateTime<Utc>,
    ) -> Result<CheckReport> {
        match source.kind() {
            CredentialKind::Keytab => self.check_keytab(source, now).await,
            CredentialKind::Certificate => self.check_certificate(source, now).await,
        }
    }

    async fn check_keytab(
        &self,
        source: &CredentialSource,
        now: DateTime<Utc>,
    ) -> Result<CheckReport> {
        let credential = self.reader.load(source)?;
        let extraction = self.extractor.extract(&credential, now);

        let label = match &extraction {
            Ok(expiry) => Some(expiry.label.clone()),
            Err(CheckerError::Expired { principal, .. }) => principal.clone(),
            Err(_) => None,
        };

        let verdict = evaluate_keytab(extraction)?;
        let alerted = match &verdict {
            Verdict::Expired { expires_at, reason } => {
                let when = expires_at
                    .map(|ts| ts.to_string())
                    .unwrap_or_else(|| "unknown date".to_string());
                let message = format!(
                    "Keytab file '{}' has expired on {} ({})",
                    source.path(),
                    when,
                    reason
                );
                tracing::warn!("{}", message);
                self.alert(&message).await?;
                true
            }
            verdict => {
                tracing::info!(
                    "Keytab {} is valid until {}",
                    source.path(),
                    verdict
                        .expires_at()
                        .map(|ts| ts.to_string())
                        .unwrap_or_default()
                );
                false
            }
        };

        Ok(CheckReport {
            verdict,
            label,
            alerted,
        })
    }

    async fn check_certificate(
        &self,
        source: &CredentialSource,
        now: DateTime<Utc>,
    ) -> Result<CheckReport> {
        let extraction = self
            .reader
            .load(source)
            .and_then(|credential| self.extractor.extract(&credential, now));

        let expiry = match extraction {
            Ok(expiry) => expiry,
            Err(e) if e.is_expiry() => {
                let reason = e.to_string();
                tracing::warn!("Certificate {} has expired: {}", source.path(), reason);
                self.alert(&reason).await?;
                return Ok(CheckReport {
                    verdict: Verdict::Expired {
                        expires_at: None,
                        reason,
                    },
                    label: None,
                    alerted: true,
                });
            }
            Err(e) => return Err(e),
        };

        let verdict = evaluate(expiry.expires_at, now, self.extractor.lookahead()?)?;
        let alerted = match verdict {
            Verdict::ExpiringSoon { expires_at } => {
                tracing::warn!(
                    "Certificate {} ({}) expires at {}, within {} seconds",
                    source.path(),
                    expiry.label,
                    expires_at,
                    self.settings.lookahead_secs
                );
                let message = format!("certificate timestamp: {} will expire soon", expires_at);
                self.alert(&message).await?;
                true
            }
            _ => {
                tracing::info!(
                    "Certificate {} ({}) is valid until {}",
                    source.path(),
                    expiry.label,
                    expiry.expires_at
                );
                false
            }
        };

        Ok(CheckReport {
            verdict,
            label: Some(expiry.label),
            alerted,
        })
    }

    async fn alert(&self, message: &str) -> Result<()> {
        self.dispatcher
            .dispatch(&self.settings.alert_target, message)
            .await
    }
}

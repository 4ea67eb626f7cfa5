// Metrics Formatter - Prometheus text exposition of remaining validity
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

pub mod collector;

pub use collector::MetricsCollector;

use crate::Result;
use crate::credentials::CredentialKind;
use crate::error::CheckerError;
use chrono::{DateTime, Utc};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

/// Content type of the exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Labels attached to a gauge in credential-list mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLabels {
    /// Last path segment of the credential file
    pub file_name: String,
    /// Certificate common name or keytab principal
    pub identity: String,
    pub team: String,
}

pub fn metric_name(kind: CredentialKind) -> &'static str {
    match kind {
        CredentialKind::Certificate => "cert_valid_sec",
        CredentialKind::Keytab => "keytab_valid_sec",
    }
}

fn metric_help(kind: CredentialKind) -> &'static str {
    match kind {
        CredentialKind::Certificate => "Seconds until the certificate expires",
        CredentialKind::Keytab => "Seconds until the keytab expires",
    }
}

/// Label key naming the identity: `common_name` for certificates, `principle` for keytabs
fn identity_label(kind: CredentialKind) -> &'static str {
    match kind {
        CredentialKind::Certificate => "common_name",
        CredentialKind::Keytab => "principle",
    }
}

/// Seconds left until `expires_at`; negative once it has passed
pub fn seconds_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (expires_at - now).num_milliseconds() as f64 / 1000.0
}

/// Render one HELP/TYPE/gauge block
///
/// Every call encodes a registry of its own, so a credential list produces
/// one block per credential even when they share a metric name.
pub fn render(
    kind: CredentialKind,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
    labels: Option<&MetricLabels>,
) -> Result<String> {
    let registry = Registry::new();
    let opts = Opts::new(metric_name(kind), metric_help(kind));
    let value = seconds_remaining(expires_at, now);

    match labels {
        Some(labels) => {
            let gauge = GaugeVec::new(opts, &["file_name", identity_label(kind), "team"])?;
            registry.register(Box::new(gauge.clone()))?;
            gauge
                .with_label_values(&[
                    labels.file_name.as_str(),
                    labels.identity.as_str(),
                    labels.team.as_str(),
                ])
                .set(value);
        }
        None => {
            let gauge = Gauge::with_opts(opts)?;
            registry.register(Box::new(gauge.clone()))?;
            gauge.set(value);
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| CheckerError::Other(format!("metrics output is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn test_render_unlabeled_certificate() {
        let out = render(
            CredentialKind::Certificate,
            at(1_700_003_600),
            at(1_700_000_000),
            None,
        )
        .unwrap();

        assert_eq!(
            out,
            "# HELP cert_valid_sec Seconds until the certificate expires\n\
             # TYPE cert_valid_sec gauge\n\
             cert_valid_sec 3600\n"
        );
    }

    #[test]
    fn test_render_labeled_keytab() {
        let labels = MetricLabels {
            file_name: "svc.keytab".to_string(),
            identity: "host,svc.example.org".to_string(),
            team: "ops".to_string(),
        };
        let out = render(
            CredentialKind::Keytab,
            at(1_700_000_100),
            at(1_700_000_000),
            Some(&labels),
        )
        .unwrap();

        assert!(out.starts_with("# HELP keytab_valid_sec "));
        assert!(out.contains("# TYPE keytab_valid_sec gauge\n"));
        assert!(out.ends_with(
            "keytab_valid_sec{file_name=\"svc.keytab\",principle=\"host,svc.example.org\",team=\"ops\"} 100\n"
        ));
    }

    #[test]
    fn test_render_labeled_certificate_uses_common_name() {
        let labels = MetricLabels {
            file_name: "host.pem".to_string(),
            identity: "host.example.org".to_string(),
            team: String::new(),
        };
        let out = render(
            CredentialKind::Certificate,
            at(1_700_000_060),
            at(1_700_000_000),
            Some(&labels),
        )
        .unwrap();

        // Label pairs come out sorted by name
        assert!(out.ends_with(
            "cert_valid_sec{common_name=\"host.example.org\",file_name=\"host.pem\",team=\"\"} 60\n"
        ));
    }

    #[test]
    fn test_render_negative_and_fractional_values() {
        let now = at(1_700_000_000);
        let out = render(CredentialKind::Certificate, at(1_699_999_000), now, None).unwrap();
        assert!(out.ends_with("cert_valid_sec -1000\n"));

        let expires = now + chrono::Duration::milliseconds(1500);
        assert_eq!(seconds_remaining(expires, now), 1.5);
        let out = render(CredentialKind::Certificate, expires, now, None).unwrap();
        assert!(out.ends_with("cert_valid_sec 1.5\n"));
    }

    #[test]
    fn test_label_values_are_escaped() {
        let labels = MetricLabels {
            file_name: "cert.pem".to_string(),
            identity: "evil\"} 1\nfake\\metric".to_string(),
            team: String::new(),
        };
        let out = render(
            CredentialKind::Certificate,
            at(10),
            at(0),
            Some(&labels),
        )
        .unwrap();

        // The gauge stays on one line
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("common_name=\"evil\\\"} 1\\nfake\\\\metric\""));
    }
}

// Metrics Collector - read credentials fresh and render their gauges

use crate::Result;
use crate::credentials::{CredentialReader, CredentialSource};
use crate::expiry::ExpiryExtractor;
use crate::metrics::{MetricLabels, render};
use crate::monitor::config::CredentialConfig;
use chrono::{DateTime, Utc};

/// Produces exposition text for one credential or a configured list
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    reader: CredentialReader,
    extractor: ExpiryExtractor,
}

impl MetricsCollector {
    pub fn new(reader: CredentialReader, extractor: ExpiryExtractor) -> Self {
        Self { reader, extractor }
    }

    /// Unlabeled block for a single credential
    pub fn single(&self, source: &CredentialSource, now: DateTime<Utc>) -> Result<String> {
        let credential = self.reader.load(source)?;
        let expiry = self.extractor.extract(&credential, now)?;

        render(credential.kind(), expiry.expires_at, now, None)
    }

    /// Labeled block for one configured credential
    pub fn labeled(
        &self,
        source: &CredentialSource,
        team: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let credential = self.reader.load(source)?;
        let expiry = self.extractor.extract(&credential, now)?;

        let labels = MetricLabels {
            file_name: source.file_name().to_string(),
            identity: expiry.label,
            team: team.to_string(),
        };

        render(credential.kind(), expiry.expires_at, now, Some(&labels))
    }

    /// Blocks for every usable entry, in list order
    ///
    /// Entries are checked one after another; a failing entry is logged and
    /// leaves no trace in the output.
    pub fn credential_list(
        &self,
        configs: &[CredentialConfig],
        team: &str,
        now: DateTime<Utc>,
    ) -> String {
        let mut out = String::new();

        for config in configs {
            let Some(source) = config.metrics_source() else {
                tracing::debug!("Skipping config entry without keytab or cert/ckey pair");
                continue;
            };

            match self.labeled(&source, team, now) {
                Ok(block) => out.push_str(&block),
                Err(e) => {
                    tracing::error!("unable to get {} info for {}: {}", source.kind(), source.path(), e);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::test_support::certificate_pem_until;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, data: &[u8]) -> String {
        let path = dir.path().join(name);
        std::fs::File::create(&path).unwrap().write_all(data).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn collector() -> MetricsCollector {
        MetricsCollector::new(CredentialReader::new(), ExpiryExtractor::new(600))
    }

    #[test]
    fn test_single_certificate() {
        let dir = TempDir::new().unwrap();
        let (cert, key) = certificate_pem_until("svc.example.org", 1_700_003_600);
        let source = CredentialSource::KeyPair {
            cert: write(&dir, "cert.pem", &cert),
            key: write(&dir, "key.pem", &key),
        };

        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let out = collector().single(&source, now).unwrap();
        assert!(out.ends_with("\ncert_valid_sec 3600\n"));
    }

    #[test]
    fn test_single_failure_is_error() {
        let source = CredentialSource::Proxy {
            path: "/nonexistent/x509up".to_string(),
        };
        assert!(collector().single(&source, Utc::now()).is_err());
    }

    #[test]
    fn test_credential_list_skips_failures() {
        let dir = TempDir::new().unwrap();
        let (cert1, key1) = certificate_pem_until("first", 1_700_003_600);
        let (cert3, key3) = certificate_pem_until("third", 1_700_007_200);

        let configs = vec![
            CredentialConfig {
                cert: Some(write(&dir, "first.pem", &cert1)),
                ckey: Some(write(&dir, "first.key", &key1)),
                keytab: None,
            },
            CredentialConfig {
                cert: Some(write(&dir, "second.pem", b"garbage")),
                ckey: Some(write(&dir, "second.key", b"garbage")),
                keytab: None,
            },
            CredentialConfig {
                cert: Some(write(&dir, "third.pem", &cert3)),
                ckey: Some(write(&dir, "third.key", &key3)),
                keytab: None,
            },
        ];

        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let out = collector().credential_list(&configs, "ops", now);

        assert!(out.contains(
            "cert_valid_sec{common_name=\"first\",file_name=\"first.pem\",team=\"ops\"} 3600\n"
        ));
        assert!(out.contains(
            "cert_valid_sec{common_name=\"third\",file_name=\"third.pem\",team=\"ops\"} 7200\n"
        ));
        assert!(!out.contains("second"));
        assert_eq!(out.matches("# TYPE cert_valid_sec gauge").count(), 2);
    }

    #[test]
    fn test_credential_list_ignores_incomplete_entries() {
        let configs = vec![CredentialConfig {
            cert: Some("/tmp/only-cert.pem".to_string()),
            ckey: None,
            keytab: None,
        }];
        assert_eq!(collector().credential_list(&configs, "", Utc::now()), "");
    }
}

// Credential Reader - load certificates, proxies and keytabs
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0
//
// A source descriptor is turned into exactly one credential kind. The choice
// is structural: a keytab path wins, a certificate with a key is a key pair,
// a certificate on its own is an X.509 proxy. There is no fallback between
// the kinds.

pub mod keytab;
pub mod klist;
pub mod pem;

pub use keytab::{Keytab, KeytabEntry, Principal};
pub use pem::CertificateBundle;

use crate::Result;
use crate::error::CheckerError;
use std::fmt;

/// Where a credential is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// PEM certificate file plus separate PEM private key file
    KeyPair { cert: String, key: String },
    /// Single file holding a delegated certificate, its key and chain
    Proxy { path: String },
    Keytab { path: String },
}

impl CredentialSource {
    /// Pick the credential kind from the supplied paths; empty strings count as absent
    pub fn from_paths(
        cert: Option<&str>,
        ckey: Option<&str>,
        keytab: Option<&str>,
    ) -> Result<Self> {
        let present = |p: Option<&str>| p.filter(|p| !p.is_empty()).map(str::to_string);

        match (present(cert), present(ckey), present(keytab)) {
            (_, _, Some(path)) => Ok(CredentialSource::Keytab { path }),
            (Some(cert), Some(key), None) => Ok(CredentialSource::KeyPair { cert, key }),
            (Some(path), None, None) => Ok(CredentialSource::Proxy { path }),
            (None, Some(_), None) => Err(CheckerError::CredentialMissing {
                what: "private key given without a certificate".to_string(),
            }),
            (None, None, None) => Err(CheckerError::CredentialMissing {
                what: "no certificate, proxy or keytab path given".to_string(),
            }),
        }
    }

    /// Certificate, proxy or keytab path
    pub fn path(&self) -> &str {
        match self {
            CredentialSource::KeyPair { cert, .. } => cert,
            CredentialSource::Proxy { path } | CredentialSource::Keytab { path } => path,
        }
    }

    /// Last path segment of [`Self::path`]
    pub fn file_name(&self) -> &str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            CredentialSource::Keytab { .. } => CredentialKind::Keytab,
            _ => CredentialKind::Certificate,
        }
    }
}

/// Coarse credential family, used for metric names and expiry rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Certificate,
    Keytab,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Certificate => write!(f, "certificate"),
            CredentialKind::Keytab => write!(f, "keytab"),
        }
    }
}

/// Loaded credential
#[derive(Debug, Clone)]
pub enum Credential {
    CertificateKeyPair(CertificateBundle),
    X509Proxy(CertificateBundle),
    Keytab(Keytab),
}

impl Credential {
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::Keytab(_) => CredentialKind::Keytab,
            _ => CredentialKind::Certificate,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Credential::CertificateKeyPair(bundle) | Credential::X509Proxy(bundle) => &bundle.path,
            Credential::Keytab(keytab) => &keytab.path,
        }
    }
}

/// How keytab files are inspected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeytabInspector {
    /// Decode the keytab file directly
    #[default]
    Native,
    /// Shell out to `klist -t -k`
    Klist,
}

/// Turns credential sources into loaded credentials
#[derive(Debug, Clone, Default)]
pub struct CredentialReader {
    keytab_inspector: KeytabInspector,
}

impl CredentialReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keytab_inspector(mut self, inspector: KeytabInspector) -> Self {
        self.keytab_inspector = inspector;
        self
    }

    /// Load the credential described by `source`
    pub fn load(&self, source: &CredentialSource) -> Result<Credential> {
        match source {
            CredentialSource::KeyPair { cert, key } => Ok(Credential::CertificateKeyPair(
                CertificateBundle::from_key_pair_files(cert, key)?,
            )),
            CredentialSource::Proxy { path } => Ok(Credential::X509Proxy(
                CertificateBundle::from_proxy_file(path)?,
            )),
            CredentialSource::Keytab { path } => {
                let keytab = match self.keytab_inspector {
                    KeytabInspector::Native => Keytab::from_file(path)?,
                    KeytabInspector::Klist => klist::inspect(path)?,
                };
                Ok(Credential::Keytab(keytab))
            }
        }
    }
}

/// Read a credential file, mapping failures onto the credential error kinds
pub(crate) fn read_source_file(path: &str, what: &str) -> Result<Vec<u8>> {
    if path.is_empty() {
        return Err(CheckerError::CredentialMissing {
            what: format!("{} path", what),
        });
    }

    std::fs::read(path).map_err(|e| CheckerError::CredentialIo {
        path: path.to_string(),
        source: e,
    })
}

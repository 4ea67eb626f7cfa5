// PEM credential loading - certificate/key pairs and X.509 proxy bundles
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::read_source_file;
use crate::error::CheckerError;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

/// Certificate chain together with its private key
#[derive(Debug)]
pub struct CertificateBundle {
    /// Path of the certificate (or proxy) file the chain was read from
    pub path: String,
    /// Certificates in stored order
    pub chain: Vec<CertificateDer<'static>>,
    pub private_key: PrivateKeyDer<'static>,
}

impl Clone for CertificateBundle {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            chain: self.chain.clone(),
            private_key: self.private_key.clone_key(),
        }
    }
}

impl CertificateBundle {
    /// Load a bundle from separate certificate and key PEM files
    pub fn from_key_pair_files(cert_path: &str, key_path: &str) -> Result<Self> {
        let cert_pem = read_source_file(cert_path, "certificate")?;
        let key_pem = read_source_file(key_path, "private key")?;
        Self::from_key_pair_pem(cert_path, &cert_pem, key_path, &key_pem)
    }

    /// Load a bundle from an X.509 proxy file holding certificate, key and chain
    pub fn from_proxy_file(path: &str) -> Result<Self> {
        let pem = read_source_file(path, "X509 proxy")?;
        Self::from_proxy_pem(path, &pem)
    }

    /// Build a bundle from in-memory certificate and key PEM data
    pub fn from_key_pair_pem(
        cert_path: &str,
        cert_pem: &[u8],
        key_path: &str,
        key_pem: &[u8],
    ) -> Result<Self> {
        let chain = read_certificates(cert_pem).map_err(|e| {
            CheckerError::format(cert_path, format!("failed to parse cert/key PEM pair: {}", e))
        })?;
        let private_key = read_private_key(key_path, key_pem).map_err(|e| {
            CheckerError::format(key_path, format!("failed to parse cert/key PEM pair: {}", e))
        })?;

        Ok(Self {
            path: cert_path.to_string(),
            chain,
            private_key,
        })
    }

    /// Build a bundle from in-memory proxy PEM data
    ///
    /// Proxies keep the delegated certificate, its key and the issuing chain in
    /// one file, in any order. Certificates keep their stored order.
    pub fn from_proxy_pem(path: &str, pem: &[u8]) -> Result<Self> {
        let chain = read_certificates(pem).map_err(|e| {
            CheckerError::format(path, format!("failed to parse X509 proxy: {}", e))
        })?;
        let private_key = read_private_key(path, pem).map_err(|e| {
            CheckerError::format(path, format!("failed to parse X509 proxy: {}", e))
        })?;

        Ok(Self {
            path: path.to_string(),
            chain,
            private_key,
        })
    }
}

type DecodeResult<T> = std::result::Result<T, String>;

fn read_certificates(pem: &[u8]) -> DecodeResult<Vec<CertificateDer<'static>>> {
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut &pem[..])
        .collect::<std::result::Result<Vec<_>, std::io::Error>>()
        .map_err(|e| format!("Failed to parse certificates: {}", e))?;

    if certs.is_empty() {
        return Err("No certificates found".to_string());
    }

    Ok(certs)
}

fn read_private_key(path: &str, pem: &[u8]) -> DecodeResult<PrivateKeyDer<'static>> {
    let mut keys = Vec::new();
    for item in rustls_pemfile::read_all(&mut &pem[..]) {
        match item {
            Ok(rustls_pemfile::Item::Pkcs8Key(key)) => {
                keys.push(PrivateKeyDer::Pkcs8(key));
            }
            Ok(rustls_pemfile::Item::Pkcs1Key(key)) => {
                keys.push(PrivateKeyDer::Pkcs1(key));
            }
            Ok(rustls_pemfile::Item::Sec1Key(key)) => {
                keys.push(PrivateKeyDer::Sec1(key));
            }
            Ok(_) => {}
            Err(e) => return Err(format!("Failed to parse PEM data: {}", e)),
        }
    }

    if keys.len() > 1 {
        tracing::warn!("Multiple private keys found in {}, using the first one", path);
    }

    keys.into_iter()
        .next()
        .ok_or_else(|| "No private key found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::test_support::{key_pem, self_signed_pem};

    #[test]
    fn test_key_pair_from_pem() {
        let (cert, key) = self_signed_pem("host.example.com", 3600);
        let bundle = CertificateBundle::from_key_pair_pem("cert.pem", &cert, "key.pem", &key)
            .unwrap();

        assert_eq!(bundle.path, "cert.pem");
        assert_eq!(bundle.chain.len(), 1);
    }

    #[test]
    fn test_key_pair_without_key_fails() {
        let (cert, _) = self_signed_pem("host.example.com", 3600);
        let err = CertificateBundle::from_key_pair_pem("cert.pem", &cert, "key.pem", &cert)
            .unwrap_err();

        assert!(matches!(err, CheckerError::CredentialFormat { .. }));
        assert!(err.to_string().contains("No private key found"));
    }

    #[test]
    fn test_key_pair_without_certificate_fails() {
        let key = key_pem();
        let err = CertificateBundle::from_key_pair_pem("cert.pem", &key, "key.pem", &key)
            .unwrap_err();

        assert!(err.to_string().contains("No certificates found"));
    }

    #[test]
    fn test_proxy_keeps_chain_order() {
        let (leaf, leaf_key) = self_signed_pem("proxy", 600);
        let (issuer, _) = self_signed_pem("issuer", 86400);

        let mut pem = leaf.clone();
        pem.extend_from_slice(&leaf_key);
        pem.extend_from_slice(&issuer);

        let bundle = CertificateBundle::from_proxy_pem("x509up_u1000", &pem).unwrap();
        assert_eq!(bundle.chain.len(), 2);

        let (_, first_der) = x509_parser::pem::parse_x509_pem(&leaf).unwrap();
        assert_eq!(bundle.chain[0].as_ref(), first_der.contents.as_slice());
    }

    #[test]
    fn test_proxy_without_key_fails() {
        let (cert, _) = self_signed_pem("proxy", 600);
        let err = CertificateBundle::from_proxy_pem("x509up_u1000", &cert).unwrap_err();

        assert!(err.to_string().contains("failed to parse X509 proxy"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CertificateBundle::from_proxy_file("/nonexistent/x509up_u0").unwrap_err();
        assert!(matches!(err, CheckerError::CredentialIo { .. }));
    }
}

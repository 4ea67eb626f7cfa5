// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cert_checker::credentials::{Keytab, KeytabEntry, Principal};
use cert_checker::monitor::AlertChannel;
use chrono::{DateTime, Utc};
use openssl::asn1::Asn1Time;
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::{X509Builder, X509NameBuilder};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Write a self-signed certificate and its PKCS#8 key, returning both paths
pub fn write_key_pair(dir: &Path, name: &str, common_name: &str, not_after: i64) -> (String, String) {
    let pkey = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();

    let mut name_builder = X509NameBuilder::new().unwrap();
    name_builder.append_entry_by_text("CN", common_name).unwrap();
    let subject = name_builder.build();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&subject).unwrap();
    builder.set_issuer_name(&subject).unwrap();
    builder
        .set_not_before(&Asn1Time::from_unix(not_after - 86400 * 90).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(not_after).unwrap())
        .unwrap();
    builder.set_pubkey(&pkey).unwrap();
    builder.sign(&pkey, MessageDigest::sha256()).unwrap();
    let cert = builder.build();

    let cert_path = dir.join(format!("{}.pem", name));
    let key_path = dir.join(format!("{}.key", name));
    std::fs::write(&cert_path, cert.to_pem().unwrap()).unwrap();
    std::fs::write(&key_path, pkey.private_key_to_pem_pkcs8().unwrap()).unwrap();

    (
        cert_path.to_str().unwrap().to_string(),
        key_path.to_str().unwrap().to_string(),
    )
}

/// Write a version 2 keytab with one entry per `(principal, created)` pair
pub fn write_keytab(dir: &Path, name: &str, entries: &[(&str, DateTime<Utc>)]) -> String {
    let keytab = Keytab {
        path: String::new(),
        version: 2,
        entries: entries
            .iter()
            .map(|(principal, created)| KeytabEntry {
                principal: Principal::parse(principal),
                timestamp: *created,
                kvno: 2,
                enctype: 18,
                key: vec![0x5a; 32],
            })
            .collect(),
    };

    let path = dir.join(name);
    std::fs::write(&path, keytab.to_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

/// Channel that only records what it was asked to send
#[derive(Clone)]
pub struct RecordingChannel {
    name: &'static str,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertChannel for RecordingChannel {
    async fn send(&self, target: &str, message: &str) -> cert_checker::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((target.to_string(), message.to_string()));
        Ok(())
    }

    fn channel_name(&self) -> &str {
        self.name
    }
}

// Monitoring configuration
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::CredentialSource;
use crate::error::CheckerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// One element of the JSON credential list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    #[serde(default)]
    pub cert: Option<String>,
    #[serde(default)]
    pub ckey: Option<String>,
    #[serde(default)]
    pub keytab: Option<String>,
}

impl CredentialConfig {
    /// Load a JSON array of credential entries
    pub fn list_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Self>> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| CheckerError::Config {
            message: format!("Failed to read config file {:?}: {}", path.as_ref(), e),
        })?;

        Self::list_from_str(&contents)
    }

    pub fn list_from_str(contents: &str) -> Result<Vec<Self>> {
        serde_json::from_str(contents).map_err(|e| CheckerError::Config {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }

    /// Source scraped for this entry
    ///
    /// A keytab wins over a certificate; certificates need both cert and key,
    /// proxies are not supported in the credential list.
    pub fn metrics_source(&self) -> Option<CredentialSource> {
        let present = |p: &Option<String>| p.as_ref().filter(|p| !p.is_empty()).cloned();

        match (present(&self.cert), present(&self.ckey), present(&self.keytab)) {
            (_, _, Some(path)) => Some(CredentialSource::Keytab { path }),
            (Some(cert), Some(key), None) => Some(CredentialSource::KeyPair { cert, key }),
            _ => None,
        }
    }
}

/// Mail relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub relay_host: String,
    pub relay_port: u16,
    /// Relay account, also used as the sender address
    pub username: String,
    pub password: String,
}

impl MailConfig {
    pub const DEFAULT_RELAY_HOST: &'static str = "smtp.gmail.com";
    pub const DEFAULT_RELAY_PORT: u16 = 587;

    /// Build from the `MAIL` and `PASSWD` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            relay_host: Self::DEFAULT_RELAY_HOST.to_string(),
            relay_port: Self::DEFAULT_RELAY_PORT,
            username: lookup("MAIL").unwrap_or_default(),
            password: lookup("PASSWD").unwrap_or_default(),
        }
    }
}

/// Webhook settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub token: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            timeout: Duration::from_secs(1),
        }
    }
}

/// Resolve the `-token` value: an existing file is read, anything else is literal
pub fn resolve_token(value: &str) -> Result<String> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let path = Path::new(value);
    if path.is_file() {
        let contents = fs::read_to_string(path).map_err(|e| CheckerError::Config {
            message: format!("Unable to read data from file: {}, error: {}", value, e),
        })?;
        return Ok(contents.replace('\n', ""));
    }

    Ok(value.to_string())
}

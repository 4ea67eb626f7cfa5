// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;
use crate::credentials::{CredentialSource, KeytabInspector};
use clap::Parser;

mod alert_args;
mod credential_args;
mod server_args;

// Re-export sub-structs
pub use alert_args::AlertArgs;
pub use credential_args::CredentialArgs;
pub use server_args::MetricsServerArgs;

/// Long flags that may also be written with a single dash (`-cert file`)
const LEGACY_FLAGS: &[&str] = &[
    "cert", "ckey", "keytab", "klist", "alert", "interval", "token", "daemon", "httpPort",
    "httpBase", "config", "team", "version", "verbose",
];

/// cert-checker - expiry checks for X.509 certificates, proxies and keytabs
///
/// The Args struct composes the argument groups with #[command(flatten)]:
/// - Credential selection (CredentialArgs)
/// - Alerting and daemon mode (AlertArgs)
/// - Prometheus endpoint (MetricsServerArgs)
#[derive(Parser, Debug, Clone)]
#[command(name = "cert-checker")]
#[command(about = "Checks certificates, X509 proxies and keytabs for upcoming expiration", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Args {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(flatten)]
    pub alerting: AlertArgs,

    #[command(flatten)]
    pub server: MetricsServerArgs,

    /// Print version information
    #[arg(long = "version")]
    pub version: bool,

    /// Print verbose information
    #[arg(long = "verbose")]
    pub verbose: bool,
}

/// What the process does, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Version,
    /// Metrics server over the JSON credential list
    ConfigMetrics,
    Daemon,
    /// Metrics server for the credential on the command line
    SingleMetrics,
    OneShot,
}

impl Args {
    /// Parse the process arguments, accepting single-dash long flags
    pub fn parse_compat() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args()))
    }

    pub fn try_parse_compat<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(normalize_legacy_flags(args))
    }

    pub fn run_mode(&self) -> RunMode {
        if self.version {
            RunMode::Version
        } else if !self.server.config.is_empty() {
            RunMode::ConfigMetrics
        } else if self.alerting.daemon > 0 {
            RunMode::Daemon
        } else if self.server.http_port > 0 {
            RunMode::SingleMetrics
        } else {
            RunMode::OneShot
        }
    }

    /// Credential named by `-cert`/`-ckey`/`-keytab`
    pub fn credential_source(&self) -> Result<CredentialSource> {
        CredentialSource::from_paths(
            Some(self.credentials.cert.as_str()),
            Some(self.credentials.ckey.as_str()),
            Some(self.credentials.keytab.as_str()),
        )
    }

    pub fn keytab_inspector(&self) -> KeytabInspector {
        if self.credentials.klist {
            KeytabInspector::Klist
        } else {
            KeytabInspector::Native
        }
    }
}

/// Rewrite `-flag` / `-flag=value` into `--flag` / `--flag=value`
///
/// Only known flag names are rewritten, so negative numbers and values that
/// happen to start with a dash pass through. The program name and everything
/// after `--` are left alone.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut passthrough = false;

    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }

            let rewritten = arg
                .strip_prefix('-')
                .filter(|rest| !rest.starts_with('-'))
                .filter(|rest| LEGACY_FLAGS.contains(&rest.split('=').next().unwrap_or_default()))
                .map(|rest| format!("--{}", rest));

            rewritten.unwrap_or(arg)
        })
        .collect()
}

/// Version line printed by `-version`
pub fn version_info() -> String {
    format!(
        "cert-checker version={} git={} date={}",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_COMMIT").unwrap_or("unknown"),
        chrono::Utc::now().format("%Y-%m-%d")
    )
}

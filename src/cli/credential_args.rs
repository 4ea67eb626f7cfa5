// Credential selection arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Which credential to check
///
/// A keytab wins over a certificate. A certificate with a key is a key pair,
/// a certificate on its own is read as an X.509 proxy.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Certificate (PEM file name) or X509 proxy
    #[arg(long = "cert", value_name = "FILE", default_value = "")]
    pub cert: String,

    /// Certificate private key (PEM file name)
    #[arg(long = "ckey", value_name = "FILE", default_value = "")]
    pub ckey: String,

    /// Keytab file to check
    #[arg(long = "keytab", value_name = "FILE", default_value = "")]
    pub keytab: String,

    /// Inspect keytabs with `klist -t -k` instead of decoding them directly
    #[arg(long = "klist")]
    pub klist: bool,
}

// Metrics server arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;

/// Prometheus endpoint options
///
/// `config` switches the endpoint to the credential list; otherwise a non-zero
/// `httpPort` serves the single credential given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct MetricsServerArgs {
    /// Start http server with provided http port
    #[arg(long = "httpPort", value_name = "PORT", default_value_t = 0)]
    pub http_port: u16,

    /// Http base path
    #[arg(long = "httpBase", value_name = "PATH", default_value = "")]
    pub http_base: String,

    /// Read credentials from a JSON config file
    #[arg(long = "config", value_name = "FILE", default_value = "")]
    pub config: String,

    /// Team label attached to every metric in config mode
    #[arg(long = "team", value_name = "NAME", default_value = "")]
    pub team: String,
}

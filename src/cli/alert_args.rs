// Alerting and daemon arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::expiry::MAX_LOOKAHEAD_SECS;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct AlertArgs {
    /// Alert email (comma separated for several) or webhook URL
    #[arg(long = "alert", value_name = "EMAIL|URL", default_value = "")]
    pub alert: String,

    /// Interval before expiration (in seconds)
    #[arg(
        long = "interval",
        value_name = "SECONDS",
        default_value_t = 600,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-MAX_LOOKAHEAD_SECS..=MAX_LOOKAHEAD_SECS)
    )]
    pub interval: i64,

    /// Token string or file containing the token
    #[arg(long = "token", value_name = "TOKEN|FILE", default_value = "")]
    pub token: String,

    /// Run as daemon with provided interval value (in seconds, 0 disables)
    #[arg(long = "daemon", value_name = "SECONDS", default_value_t = 0)]
    pub daemon: u64,
}

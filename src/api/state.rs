// Metrics Server State

use crate::credentials::CredentialSource;
use crate::metrics::MetricsCollector;
use crate::monitor::config::CredentialConfig;

/// What the endpoint reports on
#[derive(Debug, Clone)]
pub enum MetricsMode {
    /// One credential, unlabeled gauge, `500` when it cannot be read
    Single(CredentialSource),
    /// Configured credential list, labeled gauges, always `200`
    CredentialList {
        configs: Vec<CredentialConfig>,
        team: String,
    },
}

/// Shared application state
///
/// Holds no credential data: every scrape rereads the files.
#[derive(Debug, Clone)]
pub struct AppState {
    pub collector: MetricsCollector,
    pub mode: MetricsMode,
}

impl AppState {
    pub fn new(collector: MetricsCollector, mode: MetricsMode) -> Self {
        Self { collector, mode }
    }
}

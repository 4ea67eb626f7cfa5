// Credential Monitoring
//
// Checks a credential against the lookahead window, alerts through email or
// a webhook, and optionally keeps re-checking on a fixed period.

pub mod alerts;
pub mod checker;
pub mod config;
pub mod daemon;

// Re-export commonly used types
pub use alerts::{AlertChannel, AlertDispatcher, AlertTarget};
pub use checker::{CheckReport, CheckSettings, Checker};
pub use config::{CredentialConfig, MailConfig, WebhookConfig, resolve_token};
pub use daemon::MonitorDaemon;

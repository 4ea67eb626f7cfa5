// API Module - Prometheus scrape endpoint

pub mod config;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use config::MetricsServerConfig;
pub use server::MetricsServer;
pub use state::{AppState, MetricsMode};

// Metrics Server Implementation

use crate::Result;
use crate::api::{
    config::MetricsServerConfig,
    middleware, routes,
    state::{AppState, MetricsMode},
};
use crate::metrics::MetricsCollector;
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP server exposing `GET {base}/metrics`
pub struct MetricsServer {
    config: MetricsServerConfig,
    state: Arc<AppState>,
}

impl MetricsServer {
    pub fn new(config: MetricsServerConfig, collector: MetricsCollector, mode: MetricsMode) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(collector, mode)),
        }
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        Router::new()
            .route(&self.config.metrics_path(), get(routes::metrics::get_metrics))
            .layer(middleware::logging_layer())
            .with_state(self.state.clone())
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let app = self.build_router();

        if let Ok(addr) = listener.local_addr() {
            info!(
                "cert-checker metrics available at http://{}{}",
                addr,
                self.config.metrics_path()
            );
        }

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Run the server
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await
    }
}

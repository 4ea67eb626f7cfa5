// Metrics Route

use crate::api::state::{AppState, MetricsMode};
use crate::metrics::CONTENT_TYPE;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use std::sync::Arc;

/// Scrape endpoint
///
/// Credential files are read on a blocking thread for every request.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    let collected = tokio::task::spawn_blocking(move || {
        let now = Utc::now();
        match &state.mode {
            MetricsMode::Single(source) => state.collector.single(source, now),
            MetricsMode::CredentialList { configs, team } => {
                Ok(state.collector.credential_list(configs, team, now))
            }
        }
    })
    .await;

    match collected {
        Ok(Ok(body)) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Ok(Err(e)) => {
            tracing::error!("unable to get credential info: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!("Metrics task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

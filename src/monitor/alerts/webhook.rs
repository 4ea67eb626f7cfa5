// Generic Webhook Alert Channel

use crate::Result;
use crate::error::CheckerError;
use crate::monitor::alerts::AlertChannel;
use crate::monitor::config::WebhookConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// Webhook alert channel: POSTs the raw message with a bearer token
pub struct WebhookChannel {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl AlertChannel for WebhookChannel {
    async fn send(&self, target: &str, message: &str) -> Result<()> {
        if target.is_empty() {
            return Err(CheckerError::Config {
                message: "Unable to POST request to empty URL, please provide valid URL for alert option"
                    .to_string(),
            });
        }

        let response = self
            .client
            .post(target)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(CONTENT_TYPE, "application/json")
            .body(message.to_string())
            .send()
            .await?;

        // Any status other than 403 counts as delivered
        if response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("Webhook {} refused the alert: {}", target, response.status());
        } else {
            tracing::debug!("Webhook {} answered {}", target, response.status());
        }

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}

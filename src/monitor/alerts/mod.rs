// Alert System - email or webhook, picked by the shape of the target

pub mod channels;
pub mod email;
pub mod webhook;

use crate::Result;
use crate::monitor::config::{MailConfig, WebhookConfig};

pub use channels::AlertChannel;

/// Which channel a target string belongs to
///
/// The target itself is handed to that channel untouched; the email channel
/// splits it into recipients, the webhook channel posts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTarget {
    /// One or more comma-separated mail recipients
    Email,
    Webhook,
}

impl AlertTarget {
    /// A target containing `@` is a recipient list, anything else a URL
    pub fn classify(target: &str) -> Self {
        if target.contains('@') {
            AlertTarget::Email
        } else {
            AlertTarget::Webhook
        }
    }
}

/// Split a comma-separated recipient list
pub fn split_recipients(target: &str) -> Vec<String> {
    target
        .split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

/// Routes each alert to exactly one channel
pub struct AlertDispatcher {
    email: Box<dyn AlertChannel>,
    webhook: Box<dyn AlertChannel>,
}

impl AlertDispatcher {
    pub fn new(email: Box<dyn AlertChannel>, webhook: Box<dyn AlertChannel>) -> Self {
        Self { email, webhook }
    }

    /// Create the lettre and reqwest backed channels
    pub fn from_config(mail: MailConfig, webhook: WebhookConfig) -> Result<Self> {
        Ok(Self::new(
            Box::new(email::EmailChannel::new(mail)),
            Box::new(webhook::WebhookChannel::new(webhook)?),
        ))
    }

    /// Send one alert; delivery failures are returned to the caller
    pub async fn dispatch(&self, target: &str, message: &str) -> Result<()> {
        let channel = match AlertTarget::classify(target) {
            AlertTarget::Email => &self.email,
            AlertTarget::Webhook => &self.webhook,
        };

        match channel.send(target, message).await {
            Ok(()) => {
                tracing::info!("Alert sent via {}: {}", channel.channel_name(), message);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to send alert via {}: {}", channel.channel_name(), e);
                Err(e)
            }
        }
    }
}

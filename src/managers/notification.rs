//! Webhook notification manager
//!
//! Sends plain-text alerts to a configured webhook (Discord-compatible
//! `{content: ...}` body). Delivery is best-effort: a failed send is
//! logged and forgotten, alerting about alert failures would recurse.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::NotificationConfig;

/// Webhook content field limit (Discord caps at 2000 characters)
const MAX_CONTENT_CHARS: usize = 1900;

/// Notification manager for sending webhook alerts
#[derive(Clone)]
pub struct NotificationManager {
    config: NotificationConfig,
}

/// Webhook payload
#[derive(Debug, Serialize)]
struct WebhookPayload {
    content: String,
}

impl NotificationManager {
    /// Create a notification manager, or None when alerts are disabled
    /// (no webhook URL configured, or explicitly switched off)
    pub fn from_config(config: &NotificationConfig) -> Option<Self> {
        if config.is_active() {
            Some(Self {
                config: config.clone(),
            })
        } else {
            None
        }
    }

    /// Send an alert. Never raises: delivery problems are logged at
    /// debug level and otherwise ignored.
    pub fn alert(&self, message: &str) {
        let payload = WebhookPayload {
            content: truncate(message, MAX_CONTENT_CHARS),
        };
        match self.post(&payload) {
            Ok(()) => debug!("Alert delivered"),
            Err(e) => debug!("Alert delivery failed: {:#}", e),
        }
    }

    fn post(&self, payload: &WebhookPayload) -> Result<()> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let response = client
            .post(&self.config.webhook_url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .context("Failed to send webhook")?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Webhook failed with status {}: {}", status, body)
        }
    }
}

/// Cut a message down to at most `limit` characters
fn truncate(message: &str, limit: usize) -> String {
    if message.chars().count() <= limit {
        message.to_string()
    } else {
        let kept: String = message.chars().take(limit).collect();
        format!("{}...", kept)
    }
}

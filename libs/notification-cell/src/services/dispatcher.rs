use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{BookingConfirmation, NotificationConfig, NotificationError};

/// Delivers a confirmation to the client. Returns whether delivery succeeded.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, confirmation: &BookingConfirmation) -> bool;
}

/// Posts confirmations to an HTTP messaging gateway.
#[derive(Debug)]
pub struct WebhookDispatcher {
    client: Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(NotificationError::Configuration("webhook url is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Configuration(e.to_string()))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookDispatcher {
    async fn dispatch(&self, confirmation: &BookingConfirmation) -> bool {
        let payload = json!({
            "to": confirmation.client_contact,
            "message": confirmation.message_text(),
            "booking": confirmation,
        });

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Messaging gateway rejected confirmation: {}", response.status());
                false
            }
            Err(e) => {
                error!("Messaging gateway unreachable: {}", e);
                false
            }
        }
    }
}

/// Used when no gateway is configured.
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, confirmation: &BookingConfirmation) -> bool {
        info!(
            contact = %confirmation.client_contact,
            "Confirmation (not sent, no gateway configured): {}",
            confirmation.message_text()
        );
        true
    }
}

/// Pick the dispatcher matching the configuration.
pub fn dispatcher_from_config(
    config: &NotificationConfig,
    timeout: Duration,
) -> Result<Arc<dyn NotificationDispatcher>, NotificationError> {
    match &config.webhook_url {
        Some(url) => Ok(Arc::new(WebhookDispatcher::new(url.clone(), timeout)?)),
        None => Ok(Arc::new(LogDispatcher)),
    }
}

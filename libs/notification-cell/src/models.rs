use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_config::AppConfig;

/// Message handed to the dispatcher after a booking commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub client_contact: String,
    pub client_name: String,
    pub provider_name: String,
    pub date: NaiveDate,
    pub slot: String,
    pub service: String,
}

impl BookingConfirmation {
    pub fn message_text(&self) -> String {
        format!(
            "Olá {}! Seu horário de {} com {} está confirmado para {} às {}.",
            self.client_name,
            self.service,
            self.provider_name,
            self.date.format("%d/%m/%Y"),
            self.slot,
        )
    }
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub queue_capacity: usize,
    pub webhook_url: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            webhook_url: None,
        }
    }
}

impl From<&AppConfig> for NotificationConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            queue_capacity: config.notification_queue_capacity.max(1),
            webhook_url: config.notification_webhook_url.clone(),
        }
    }
}

/// Counters returned when a worker drains and stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub delivered: u64,
    pub failed: u64,
}

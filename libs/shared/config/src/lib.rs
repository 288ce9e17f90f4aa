use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub storage_timeout_ms: u64,
    pub notification_webhook_url: Option<String>,
    pub notification_queue_capacity: usize,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            storage_timeout_ms: 5_000,
            notification_webhook_url: None,
            notification_queue_capacity: 256,
            server_port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) if value.eq_ignore_ascii_case("supabase") => StorageBackend::Supabase,
            Ok(value) if value.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            Ok(value) => {
                warn!("Unknown STORAGE_BACKEND '{}', using in-memory storage", value);
                StorageBackend::Memory
            }
            Err(_) => StorageBackend::Memory,
        };

        let config = Self {
            storage_backend,
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    if storage_backend == StorageBackend::Supabase {
                        warn!("SUPABASE_URL not set, using empty value");
                    }
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    if storage_backend == StorageBackend::Supabase {
                        warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    }
                    String::new()
                }),
            storage_timeout_ms: parse_or("STORAGE_TIMEOUT_MS", defaults.storage_timeout_ms),
            notification_webhook_url: env::var("NOTIFICATION_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            notification_queue_capacity: parse_or(
                "NOTIFICATION_QUEUE_CAPACITY",
                defaults.notification_queue_capacity,
            ),
            server_port: parse_or("SERVER_PORT", defaults.server_port),
        };

        if !config.is_configured() {
            warn!("Supabase backend selected but not fully configured - missing environment variables");
        }

        config
    }

    /// True when the selected storage backend has everything it needs.
    pub fn is_configured(&self) -> bool {
        match self.storage_backend {
            StorageBackend::Memory => true,
            StorageBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
            }
        }
    }

    pub fn is_notification_configured(&self) -> bool {
        self.notification_webhook_url.is_some()
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_memory_backend() {
        let config = AppConfig::default();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert!(config.is_configured());
        assert!(!config.is_notification_configured());
        assert_eq!(config.storage_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn supabase_backend_requires_url_and_key() {
        let mut config = AppConfig {
            storage_backend: StorageBackend::Supabase,
            ..AppConfig::default()
        };
        assert!(!config.is_configured());

        config.supabase_url = "http://localhost:54321".to_string();
        config.supabase_anon_key = "anon".to_string();
        assert!(config.is_configured());
    }
}

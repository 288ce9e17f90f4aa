use std::sync::Arc;

use axum::{body::to_bytes, response::Response};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use shared_config::{AppConfig, StorageBackend};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub storage_timeout_ms: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            storage_timeout_ms: 2_000,
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            storage_backend: StorageBackend::Supabase,
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            storage_timeout_ms: self.storage_timeout_ms,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn provider_response(id: i64, name: &str, specialty: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "specialty": specialty
        })
    }

    pub fn booking_response(
        id: i64,
        provider_id: i64,
        date: NaiveDate,
        slot: &str,
        price: Option<f64>,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "client_name": "Test Client",
            "client_contact": null,
            "provider_id": provider_id,
            "date": date.format("%Y-%m-%d").to_string(),
            "slot": slot,
            "service": "Corte",
            "price": price,
            "status": status,
            "created_at": Utc::now().to_rfc3339()
        })
    }

    pub fn unique_violation() -> Value {
        json!({
            "code": "23505",
            "details": "Key (provider_id, date, slot) already exists.",
            "message": "duplicate key value violates unique constraint \"bookings_active_slot_uidx\""
        })
    }
}

/// Collect an axum response body and deserialize it.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}

use std::fmt;

use anyhow::{Context, Result};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Postgres error code PostgREST reports for unique constraint violations.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Non-success response from the PostgREST API. Wrapped in `anyhow::Error`
/// so callers can `downcast_ref` when they need the status.
#[derive(Debug, Clone)]
pub struct SupabaseApiError {
    pub status: StatusCode,
    pub body: String,
}

impl SupabaseApiError {
    pub fn is_unique_violation(&self) -> bool {
        self.status == StatusCode::CONFLICT || self.body.contains(UNIQUE_VIOLATION)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl fmt::Display for SupabaseApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error ({}): {}", self.status, self.body)
    }
}

impl std::error::Error for SupabaseApiError {}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.storage_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    fn get_headers(&self, prefer: Option<&'static str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(prefer) = prefer {
            headers.insert("Prefer", HeaderValue::from_static(prefer));
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(method, path, body, None).await
    }

    /// Same as `request`, but asks PostgREST to echo the written rows back.
    pub async fn request_returning<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(method, path, body, Some("return=representation")).await
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        prefer: Option<&'static str>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers(prefer)?);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(SupabaseApiError { status, body: error_text }.into());
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

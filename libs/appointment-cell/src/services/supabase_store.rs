// libs/appointment-cell/src/services/supabase_store.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, error, warn};

use provider_cell::ProviderId;
use shared_database::{SupabaseApiError, SupabaseClient};

use crate::models::{Booking, BookingError, BookingId, BookingStatus, NewBooking, DATE_FORMAT};
use crate::services::store::BookingStore;

const BOOKINGS_PATH: &str = "/rest/v1/bookings";

/// Matches the PostgREST `max-rows` cap Supabase ships with.
const DEFAULT_PAGE_SIZE: usize = 1000;

/// PostgREST-backed store. Slot exclusivity is enforced by the
/// `bookings_active_slot_uidx` partial unique index.
pub struct SupabaseBookingStore {
    supabase: Arc<SupabaseClient>,
    page_size: usize,
}

impl SupabaseBookingStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self {
            supabase,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Booking>, BookingError> {
        let path = format!("{}?{}", BOOKINGS_PATH, query);
        self.supabase
            .request::<Vec<Booking>>(Method::GET, &path, None)
            .await
            .map_err(storage_failure)
    }

    /// Reads every matching row, one page at a time, until a short page comes back.
    /// `query` must carry an `order` that is stable across pages.
    async fn fetch_all(&self, query: &str) -> Result<Vec<Booking>, BookingError> {
        let mut rows = Vec::new();
        loop {
            let page = self
                .fetch(&format!(
                    "{}&limit={}&offset={}",
                    query,
                    self.page_size,
                    rows.len()
                ))
                .await?;
            let last_page = page.len() < self.page_size;
            rows.extend(page);
            if last_page {
                break;
            }
        }
        debug!("Fetched {} bookings in pages of {}", rows.len(), self.page_size);
        Ok(rows)
    }
}

fn storage_failure(err: anyhow::Error) -> BookingError {
    error!("Booking storage error: {}", err);
    BookingError::StorageFailure(err.to_string())
}

#[async_trait]
impl BookingStore for SupabaseBookingStore {
    async fn insert_scheduled(&self, booking: NewBooking) -> Result<Booking, BookingError> {
        let key = booking.slot_key();
        let body = json!({
            "client_name": booking.client_name,
            "client_contact": booking.client_contact,
            "provider_id": booking.provider_id,
            "date": booking.date.format(DATE_FORMAT).to_string(),
            "slot": booking.slot,
            "service": booking.service,
            "price": booking.price,
            "status": BookingStatus::Scheduled,
            "created_at": booking.created_at.to_rfc3339(),
        });

        let result = self
            .supabase
            .request_returning::<Vec<Booking>>(Method::POST, BOOKINGS_PATH, Some(body))
            .await;

        match result {
            Ok(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            Ok(_) => Err(BookingError::StorageFailure(
                "insert returned no representation".to_string(),
            )),
            Err(err) => {
                let unique_violation = err
                    .downcast_ref::<SupabaseApiError>()
                    .map(SupabaseApiError::is_unique_violation)
                    .unwrap_or(false);
                if unique_violation {
                    warn!(
                        "Unique index rejected booking for provider {} on {} at {}",
                        key.provider_id, key.date, key.slot
                    );
                    Err(BookingError::conflict(&key))
                } else {
                    Err(storage_failure(err))
                }
            }
        }
    }

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, BookingError> {
        let mut rows = self.fetch(&format!("id=eq.{}&limit=1", id)).await?;
        Ok(rows.pop())
    }

    async fn list_scheduled_for(
        &self,
        provider_id: ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        debug!("Fetching scheduled bookings for provider {} on {}", provider_id, date);
        self.fetch(&format!(
            "provider_id=eq.{}&date=eq.{}&status=eq.scheduled&order=slot.asc",
            provider_id,
            date.format(DATE_FORMAT)
        ))
        .await
    }

    async fn list_scheduled(&self) -> Result<Vec<Booking>, BookingError> {
        self.fetch_all("status=eq.scheduled&order=date.desc,id.asc").await
    }

    async fn mark_cancelled(&self, id: BookingId) -> Result<Option<Booking>, BookingError> {
        let path = format!("{}?id=eq.{}&status=eq.scheduled", BOOKINGS_PATH, id);
        let mut updated = self
            .supabase
            .request_returning::<Vec<Booking>>(
                Method::PATCH,
                &path,
                Some(json!({ "status": BookingStatus::Cancelled })),
            )
            .await
            .map_err(storage_failure)?;

        match updated.pop() {
            Some(booking) => Ok(Some(booking)),
            // Nothing matched: either unknown or already cancelled.
            None => self.find(id).await,
        }
    }
}

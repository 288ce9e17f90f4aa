// libs/appointment-cell/src/services/store.rs
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, error};

use provider_cell::ProviderId;

use crate::models::{Booking, BookingError, BookingId, BookingStatus, NewBooking, SlotKey};

/// Durable booking storage. Passed explicitly to the ledger, resolver and reports.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert `booking` as SCHEDULED unless a SCHEDULED booking already holds
    /// its slot key. Check and insert are one atomic step; a lost race returns
    /// `BookingError::Conflict`.
    async fn insert_scheduled(&self, booking: NewBooking) -> Result<Booking, BookingError>;

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, BookingError>;

    /// SCHEDULED bookings for one provider and day, in any order.
    async fn list_scheduled_for(
        &self,
        provider_id: ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError>;

    /// Every SCHEDULED booking.
    async fn list_scheduled(&self) -> Result<Vec<Booking>, BookingError>;

    /// Move a SCHEDULED booking to CANCELLED. Already cancelled bookings are
    /// returned unchanged; `None` means the id is unknown.
    async fn mark_cancelled(&self, id: BookingId) -> Result<Option<Booking>, BookingError>;
}

/// Bound a storage call; an elapsed deadline surfaces as `StorageFailure`.
pub async fn with_storage_timeout<T, F>(limit: Duration, operation: F) -> Result<T, BookingError>
where
    F: Future<Output = Result<T, BookingError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            error!("Storage operation timed out after {:?}", limit);
            Err(BookingError::StorageFailure(format!(
                "storage did not respond within {} ms",
                limit.as_millis()
            )))
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    next_id: BookingId,
    rows: BTreeMap<BookingId, Booking>,
    active: HashMap<SlotKey, BookingId>,
}

/// Process-local store. The slot index and the rows share one lock, so the
/// uniqueness check and the insert cannot interleave with another writer.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    state: RwLock<InMemoryState>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert_scheduled(&self, booking: NewBooking) -> Result<Booking, BookingError> {
        let key = booking.slot_key();
        let mut state = self.state.write().await;

        if state.active.contains_key(&key) {
            return Err(BookingError::conflict(&key));
        }

        state.next_id += 1;
        let id = state.next_id;
        let stored = booking.into_booking(id);
        state.active.insert(key, id);
        state.rows.insert(id, stored.clone());

        debug!("Stored booking {} in memory", id);
        Ok(stored)
    }

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, BookingError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn list_scheduled_for(
        &self,
        provider_id: ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|b| b.is_scheduled() && b.provider_id == provider_id && b.date == date)
            .cloned()
            .collect())
    }

    async fn list_scheduled(&self) -> Result<Vec<Booking>, BookingError> {
        let state = self.state.read().await;
        Ok(state.rows.values().filter(|b| b.is_scheduled()).cloned().collect())
    }

    async fn mark_cancelled(&self, id: BookingId) -> Result<Option<Booking>, BookingError> {
        let mut state = self.state.write().await;

        let key = match state.rows.get_mut(&id) {
            None => return Ok(None),
            Some(booking) if !booking.is_scheduled() => return Ok(Some(booking.clone())),
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                booking.slot_key()
            }
        };

        if state.active.get(&key) == Some(&id) {
            state.active.remove(&key);
        }

        Ok(state.rows.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_booking(slot: &str) -> NewBooking {
        NewBooking {
            client_name: "Ana".to_string(),
            client_contact: None,
            provider_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            slot: slot.to_string(),
            service: "Corte".to_string(),
            price: Some(30.0),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = InMemoryBookingStore::new();
        let first = store.insert_scheduled(new_booking("09:00")).await.unwrap();
        let second = store.insert_scheduled(new_booking("09:30")).await.unwrap();

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn duplicate_key_conflicts_and_cancel_releases_it() {
        let store = InMemoryBookingStore::new();
        let booking = store.insert_scheduled(new_booking("10:00")).await.unwrap();

        let err = store.insert_scheduled(new_booking("10:00")).await.unwrap_err();
        assert!(matches!(err, BookingError::Conflict { .. }));

        let cancelled = store.mark_cancelled(booking.id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(store.insert_scheduled(new_booking("10:00")).await.is_ok());
    }

    #[tokio::test]
    async fn timeout_becomes_storage_failure() {
        let result: Result<(), BookingError> = with_storage_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(BookingError::StorageFailure(_))));
    }
}

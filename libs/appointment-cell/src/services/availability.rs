// libs/appointment-cell/src/services/availability.rs
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use provider_cell::{ProviderCatalog, ProviderId};

use crate::models::{parse_booking_date, AvailabilityResponse, BookingError};
use crate::services::slot_grid::SlotGrid;
use crate::services::store::{with_storage_timeout, BookingStore};

/// Computes free slots for a provider on a day: the grid minus what is booked.
///
/// The answer reflects the store at the moment of the read. It is not held
/// until a later `create`, so two clients may both see a slot as free; the
/// ledger settles that race.
pub struct AvailabilityResolver {
    store: Arc<dyn BookingStore>,
    catalog: Arc<ProviderCatalog>,
    grid: Arc<SlotGrid>,
    storage_timeout: Duration,
}

impl AvailabilityResolver {
    pub fn new(
        store: Arc<dyn BookingStore>,
        catalog: Arc<ProviderCatalog>,
        grid: Arc<SlotGrid>,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            store,
            catalog,
            grid,
            storage_timeout,
        }
    }

    /// Free slot labels in canonical grid order. An empty result means the
    /// day is fully booked.
    pub async fn compute(
        &self,
        provider_id: ProviderId,
        date: &str,
    ) -> Result<Vec<String>, BookingError> {
        Ok(self.resolve(provider_id, date).await?.available_slots)
    }

    pub async fn resolve(
        &self,
        provider_id: ProviderId,
        date: &str,
    ) -> Result<AvailabilityResponse, BookingError> {
        if !self.catalog.contains(provider_id) {
            return Err(BookingError::provider_not_found(provider_id));
        }
        let date = parse_booking_date(date)?;

        let booked = with_storage_timeout(
            self.storage_timeout,
            self.store.list_scheduled_for(provider_id, date),
        )
        .await?;

        let taken: HashSet<&str> = booked.iter().map(|b| b.slot.as_str()).collect();
        let available_slots: Vec<String> = self
            .grid
            .labels()
            .iter()
            .filter(|label| !taken.contains(label.as_str()))
            .cloned()
            .collect();

        debug!(
            "Provider {} on {}: {} booked, {} free",
            provider_id,
            date,
            taken.len(),
            available_slots.len()
        );

        Ok(AvailabilityResponse {
            provider_id,
            date,
            available_slots,
        })
    }
}

// libs/appointment-cell/src/services/ledger.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use notification_cell::{BookingConfirmation, NotificationPublisher};
use provider_cell::{Provider, ProviderCatalog, ProviderId};

use crate::models::{
    parse_booking_date, AgendaEntry, Booking, BookingError, BookingId, CreateBookingRequest,
    NewBooking,
};
use crate::services::slot_grid::SlotGrid;
use crate::services::store::{with_storage_timeout, BookingStore};

/// Sole writer of bookings. Guarantees at most one SCHEDULED booking per
/// (provider, date, slot).
pub struct BookingLedger {
    store: Arc<dyn BookingStore>,
    catalog: Arc<ProviderCatalog>,
    grid: Arc<SlotGrid>,
    notifier: Option<NotificationPublisher>,
    storage_timeout: Duration,
}

impl BookingLedger {
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
            notifier: None,
            storage_timeout,
        }
    }

    /// Publish confirmations for committed bookings that carry a contact.
    pub fn with_notifier(mut self, notifier: NotificationPublisher) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validate and commit a booking. Exactly one of several concurrent
    /// requests for the same slot succeeds; the others get `Conflict`.
    #[instrument(skip(self, request), fields(provider_id = request.provider_id, slot = %request.slot))]
    pub async fn create(&self, request: CreateBookingRequest) -> Result<Booking, BookingError> {
        let (new_booking, provider) = self.validate(request)?;
        let key = new_booking.slot_key();

        let booking = match with_storage_timeout(
            self.storage_timeout,
            self.store.insert_scheduled(new_booking),
        )
        .await
        {
            Ok(booking) => booking,
            Err(err @ BookingError::Conflict { .. }) => {
                warn!(
                    "Slot {} on {} already taken for provider {}",
                    key.slot, key.date, key.provider_id
                );
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        info!(
            "Booking {} committed for provider {} on {} at {}",
            booking.id, booking.provider_id, booking.date, booking.slot
        );

        self.publish_confirmation(&booking, provider);
        Ok(booking)
    }

    pub async fn get(&self, booking_id: BookingId) -> Result<Booking, BookingError> {
        with_storage_timeout(self.storage_timeout, self.store.find(booking_id))
            .await?
            .ok_or_else(|| BookingError::booking_not_found(booking_id))
    }

    /// SCHEDULED bookings for a provider and day, in slot order.
    pub async fn list_for_provider_date(
        &self,
        provider_id: ProviderId,
        date: &str,
    ) -> Result<Vec<Booking>, BookingError> {
        if !self.catalog.contains(provider_id) {
            return Err(BookingError::provider_not_found(provider_id));
        }
        let date = parse_booking_date(date)?;

        let mut bookings = with_storage_timeout(
            self.storage_timeout,
            self.store.list_scheduled_for(provider_id, date),
        )
        .await?;
        bookings.retain(Booking::is_scheduled);
        bookings.sort_by(|a, b| {
            let pos_a = self.grid.position(&a.slot).unwrap_or(usize::MAX);
            let pos_b = self.grid.position(&b.slot).unwrap_or(usize::MAX);
            pos_a.cmp(&pos_b).then_with(|| a.slot.cmp(&b.slot))
        });

        debug!("Provider {} has {} bookings on {}", provider_id, bookings.len(), date);
        Ok(bookings)
    }

    /// The day's agenda for a provider: scheduled bookings with the provider name.
    pub async fn agenda(
        &self,
        provider_id: ProviderId,
        date: &str,
    ) -> Result<Vec<AgendaEntry>, BookingError> {
        let bookings = self.list_for_provider_date(provider_id, date).await?;
        let provider_name = self
            .catalog
            .get_provider(provider_id)
            .map(|p| p.name.clone())
            .map_err(|_| BookingError::provider_not_found(provider_id))?;

        Ok(bookings
            .into_iter()
            .map(|booking| AgendaEntry {
                booking,
                provider_name: provider_name.clone(),
            })
            .collect())
    }

    /// Cancel a booking and free its slot. Cancelling twice is a no-op.
    #[instrument(skip(self))]
    pub async fn cancel(&self, booking_id: BookingId) -> Result<Booking, BookingError> {
        let booking = with_storage_timeout(
            self.storage_timeout,
            self.store.mark_cancelled(booking_id),
        )
        .await?
        .ok_or_else(|| BookingError::booking_not_found(booking_id))?;

        info!(
            "Booking {} is cancelled; slot {} on {} is free for provider {}",
            booking.id, booking.slot, booking.date, booking.provider_id
        );
        Ok(booking)
    }

    pub fn slot_grid(&self) -> &SlotGrid {
        &self.grid
    }

    fn validate(&self, request: CreateBookingRequest) -> Result<(NewBooking, &Provider), BookingError> {
        let client_name = required("client_name", &request.client_name)?;
        let service = required("service", &request.service)?;
        let date = parse_booking_date(&request.date)?;

        let slot = request.slot.trim();
        if !self.grid.contains(slot) {
            return Err(BookingError::invalid(
                "slot",
                format!("'{}' is not a bookable slot", request.slot),
            ));
        }

        if let Some(price) = request.price {
            if !price.is_finite() || price < 0.0 {
                return Err(BookingError::invalid(
                    "price",
                    format!("{} is not a non-negative amount", price),
                ));
            }
            if (price * 100.0).round() / 100.0 != price {
                return Err(BookingError::invalid(
                    "price",
                    format!("{} has more than two decimal places", price),
                ));
            }
        }

        let provider = self
            .catalog
            .get_provider(request.provider_id)
            .map_err(|_| BookingError::provider_not_found(request.provider_id))?;

        let client_contact = request
            .client_contact
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let new_booking = NewBooking {
            client_name,
            client_contact,
            provider_id: provider.id,
            date,
            slot: slot.to_string(),
            service,
            price: request.price,
            created_at: Utc::now(),
        };

        Ok((new_booking, provider))
    }

    fn publish_confirmation(&self, booking: &Booking, provider: &Provider) {
        let (Some(notifier), Some(contact)) = (&self.notifier, &booking.client_contact) else {
            debug!("No confirmation for booking {}", booking.id);
            return;
        };

        let confirmation = BookingConfirmation {
            client_contact: contact.clone(),
            client_name: booking.client_name.clone(),
            provider_name: provider.name.clone(),
            date: booking.date,
            slot: booking.slot.clone(),
            service: booking.service.clone(),
        };

        if let Err(e) = notifier.publish(confirmation) {
            warn!("Confirmation for booking {} dropped: {}", booking.id, e);
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::invalid(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

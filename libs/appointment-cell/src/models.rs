// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use provider_cell::ProviderId;

pub type BookingId = i64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub client_name: String,
    pub client_contact: Option<String>,
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slot: String,
    pub service: String,
    pub price: Option<f64>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_scheduled(&self) -> bool {
        self.status == BookingStatus::Scheduled
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.provider_id, self.date, &self.slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Scheduled => write!(f, "scheduled"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The unit of mutual exclusion: one active booking per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slot: String,
}

impl SlotKey {
    pub fn new(provider_id: ProviderId, date: NaiveDate, slot: &str) -> Self {
        Self {
            provider_id,
            date,
            slot: slot.to_string(),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Text fields default to empty so a missing one is reported by field
/// during validation rather than rejected by the JSON extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_contact: Option<String>,
    pub provider_id: ProviderId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// A validated booking, ready for the store. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub client_name: String,
    pub client_contact: Option<String>,
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slot: String,
    pub service: String,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.provider_id, self.date, &self.slot)
    }

    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            client_name: self.client_name,
            client_contact: self.client_contact,
            provider_id: self.provider_id,
            date: self.date,
            slot: self.slot,
            service: self.service,
            price: self.price,
            status: BookingStatus::Scheduled,
            created_at: self.created_at,
        }
    }
}

/// Agenda row: a scheduled booking plus the provider's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaEntry {
    #[serde(flatten)]
    pub booking: Booking,
    pub provider_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub booking_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub available_slots: Vec<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Slot {slot} on {date} is already booked for provider {provider_id}")]
    Conflict {
        provider_id: ProviderId,
        date: NaiveDate,
        slot: String,
    },

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl BookingError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        BookingError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn provider_not_found(id: ProviderId) -> Self {
        BookingError::NotFound { entity: "Provider", id }
    }

    pub fn booking_not_found(id: BookingId) -> Self {
        BookingError::NotFound { entity: "Booking", id }
    }

    pub fn conflict(key: &SlotKey) -> Self {
        BookingError::Conflict {
            provider_id: key.provider_id,
            date: key.date,
            slot: key.slot.clone(),
        }
    }
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_booking_date(raw: &str) -> Result<NaiveDate, BookingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BookingError::invalid("date", "date is required"));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        BookingError::invalid("date", format!("'{}' is not a valid YYYY-MM-DD date", trimmed))
    })
}

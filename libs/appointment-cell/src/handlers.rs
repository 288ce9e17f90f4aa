// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use provider_cell::ProviderId;
use shared_models::error::AppError;

use crate::models::{AgendaEntry, Booking, BookingError, BookingId, CreateBookingRequest, DailySummary};
use crate::services::context::AppointmentContext;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub provider_id: ProviderId,
    pub date: String,
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidInput { field, message } => AppError::ValidationError {
                field: field.to_string(),
                message,
            },
            BookingError::NotFound { .. } => AppError::NotFound(err.to_string()),
            BookingError::Conflict { .. } => AppError::Conflict(err.to_string()),
            BookingError::StorageFailure(msg) => AppError::StorageUnavailable(msg),
        }
    }
}

// ==============================================================================
// HANDLERS
// ==============================================================================

pub async fn get_slot_grid(State(context): State<Arc<AppointmentContext>>) -> Json<Value> {
    Json(json!({ "slots": context.ledger.slot_grid().labels() }))
}

pub async fn get_availability(
    State(context): State<Arc<AppointmentContext>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let availability = context.resolver.resolve(query.provider_id, &query.date).await?;
    Ok(Json(json!(availability)))
}

pub async fn create_booking(
    State(context): State<Arc<AppointmentContext>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let booking = context.ledger.create(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn get_booking(
    State(context): State<Arc<AppointmentContext>>,
    Path(booking_id): Path<BookingId>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(context.ledger.get(booking_id).await?))
}

pub async fn cancel_booking(
    State(context): State<Arc<AppointmentContext>>,
    Path(booking_id): Path<BookingId>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(context.ledger.cancel(booking_id).await?))
}

pub async fn get_agenda(
    State(context): State<Arc<AppointmentContext>>,
    Path((provider_id, date)): Path<(ProviderId, String)>,
) -> Result<Json<Vec<AgendaEntry>>, AppError> {
    Ok(Json(context.ledger.agenda(provider_id, &date).await?))
}

pub async fn get_daily_report(
    State(context): State<Arc<AppointmentContext>>,
) -> Result<Json<Vec<DailySummary>>, AppError> {
    Ok(Json(context.reporting.daily_summary().await?))
}

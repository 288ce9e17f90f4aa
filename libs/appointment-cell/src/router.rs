// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::context::AppointmentContext;

pub fn appointment_routes(context: Arc<AppointmentContext>) -> Router {
    Router::new()
        .route("/", post(handlers::create_booking))
        .route("/slots", get(handlers::get_slot_grid))
        .route("/availability", get(handlers::get_availability))
        .route("/agenda/{provider_id}/{date}", get(handlers::get_agenda))
        .route("/reports/daily", get(handlers::get_daily_report))
        .route("/{booking_id}", get(handlers::get_booking))
        .route("/{booking_id}/cancel", post(handlers::cancel_booking))
        .with_state(context)
}

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use appointment_cell::models::CreateBookingRequest;
use appointment_cell::services::{
    BookingLedger, BookingStore, InMemoryBookingStore, ReportingService, SlotGrid,
};
use provider_cell::ProviderCatalog;

fn setup() -> (BookingLedger, ReportingService) {
    let store: Arc<dyn BookingStore> = Arc::new(InMemoryBookingStore::new());
    let timeout = Duration::from_secs(2);
    let ledger = BookingLedger::new(
        store.clone(),
        Arc::new(ProviderCatalog::seeded()),
        Arc::new(SlotGrid::standard()),
        timeout,
    );
    (ledger, ReportingService::new(store, timeout))
}

fn booking(provider_id: i64, date: &str, slot: &str, price: Option<f64>) -> CreateBookingRequest {
    CreateBookingRequest {
        client_name: "Cliente".to_string(),
        client_contact: None,
        provider_id,
        date: date.to_string(),
        slot: slot.to_string(),
        service: "Corte".to_string(),
        price,
    }
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn missing_price_counts_as_zero_revenue() {
    let (ledger, reporting) = setup();
    ledger.create(booking(1, "2024-06-01", "09:00", Some(10.0))).await.unwrap();
    ledger.create(booking(2, "2024-06-01", "09:00", None)).await.unwrap();
    ledger.create(booking(3, "2024-06-01", "09:00", Some(25.5))).await.unwrap();

    let summary = reporting.daily_summary().await.unwrap();

    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].date, date("2024-06-01"));
    assert_eq!(summary[0].total_revenue, 35.5);
    assert_eq!(summary[0].booking_count, 3);
}

#[tokio::test]
async fn days_are_listed_most_recent_first_across_providers() {
    let (ledger, reporting) = setup();
    ledger.create(booking(1, "2024-05-30", "09:00", Some(20.0))).await.unwrap();
    ledger.create(booking(2, "2024-06-02", "10:00", Some(40.0))).await.unwrap();
    ledger.create(booking(3, "2024-06-02", "10:00", Some(15.0))).await.unwrap();
    ledger.create(booking(1, "2024-06-01", "14:00", Some(30.0))).await.unwrap();

    let summary = reporting.daily_summary().await.unwrap();
    let rows: Vec<(NaiveDate, f64, u64)> = summary
        .iter()
        .map(|s| (s.date, s.total_revenue, s.booking_count))
        .collect();

    assert_eq!(
        rows,
        vec![
            (date("2024-06-02"), 55.0, 2),
            (date("2024-06-01"), 30.0, 1),
            (date("2024-05-30"), 20.0, 1),
        ]
    );
}

#[tokio::test]
async fn cancelled_bookings_are_excluded_and_reports_track_live_state() {
    let (ledger, reporting) = setup();
    let keep = ledger.create(booking(1, "2024-06-01", "09:00", Some(10.0))).await.unwrap();
    let dropped = ledger.create(booking(1, "2024-06-01", "09:30", Some(99.0))).await.unwrap();
    let only = ledger.create(booking(1, "2024-06-03", "09:00", Some(5.0))).await.unwrap();

    ledger.cancel(dropped.id).await.unwrap();
    ledger.cancel(only.id).await.unwrap();

    let summary = reporting.daily_summary().await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].date, keep.date);
    assert_eq!(summary[0].total_revenue, 10.0);
    assert_eq!(summary[0].booking_count, 1);
}

#[tokio::test]
async fn revenue_is_rounded_to_cents() {
    let (ledger, reporting) = setup();
    ledger.create(booking(1, "2024-06-01", "09:00", Some(0.1))).await.unwrap();
    ledger.create(booking(1, "2024-06-01", "09:30", Some(0.2))).await.unwrap();

    let summary = reporting.daily_summary().await.unwrap();
    assert_eq!(summary[0].total_revenue, 0.3);
}

#[tokio::test]
async fn no_bookings_means_empty_report() {
    let (_ledger, reporting) = setup();
    assert!(reporting.daily_summary().await.unwrap().is_empty());
}

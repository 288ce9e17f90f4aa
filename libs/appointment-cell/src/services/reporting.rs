use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{BookingError, DailySummary};
use crate::services::store::{with_storage_timeout, BookingStore};

/// Per-day revenue and volume, recomputed from the store on every call.
pub struct ReportingService {
    store: Arc<dyn BookingStore>,
    storage_timeout: Duration,
}

impl ReportingService {
    pub fn new(store: Arc<dyn BookingStore>, storage_timeout: Duration) -> Self {
        Self {
            store,
            storage_timeout,
        }
    }

    /// One row per date with scheduled bookings, most recent first.
    /// Missing prices count as zero revenue but still count as a booking.
    pub async fn daily_summary(&self) -> Result<Vec<DailySummary>, BookingError> {
        let bookings =
            with_storage_timeout(self.storage_timeout, self.store.list_scheduled()).await?;

        let mut by_date: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();
        for booking in bookings.iter().filter(|b| b.is_scheduled()) {
            let entry = by_date.entry(booking.date).or_insert((0.0, 0));
            entry.0 += booking.price.unwrap_or(0.0);
            entry.1 += 1;
        }

        debug!("Daily summary over {} bookings, {} days", bookings.len(), by_date.len());

        Ok(by_date
            .into_iter()
            .rev()
            .map(|(date, (revenue, count))| DailySummary {
                date,
                total_revenue: round_cents(revenue),
                booking_count: count,
            })
            .collect())
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

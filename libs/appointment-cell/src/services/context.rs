use std::sync::Arc;
use std::time::Duration;

use notification_cell::NotificationPublisher;
use provider_cell::ProviderCatalog;

use crate::services::availability::AvailabilityResolver;
use crate::services::ledger::BookingLedger;
use crate::services::reporting::ReportingService;
use crate::services::slot_grid::SlotGrid;
use crate::services::store::BookingStore;

/// Services shared by the appointment routes, all built over one store handle.
pub struct AppointmentContext {
    pub ledger: BookingLedger,
    pub resolver: AvailabilityResolver,
    pub reporting: ReportingService,
}

impl AppointmentContext {
    pub fn new(
        store: Arc<dyn BookingStore>,
        catalog: Arc<ProviderCatalog>,
        grid: Arc<SlotGrid>,
        notifier: Option<NotificationPublisher>,
        storage_timeout: Duration,
    ) -> Self {
        let mut ledger = BookingLedger::new(
            Arc::clone(&store),
            Arc::clone(&catalog),
            Arc::clone(&grid),
            storage_timeout,
        );
        if let Some(notifier) = notifier {
            ledger = ledger.with_notifier(notifier);
        }

        Self {
            ledger,
            resolver: AvailabilityResolver::new(
                Arc::clone(&store),
                catalog,
                grid,
                storage_timeout,
            ),
            reporting: ReportingService::new(store, storage_timeout),
        }
    }
}

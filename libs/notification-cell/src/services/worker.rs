use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::{BookingConfirmation, WorkerStats};
use crate::services::dispatcher::NotificationDispatcher;

/// Drains the confirmation queue and hands each message to the dispatcher.
/// Outcomes are logged only; nothing is retried or reported back to the ledger.
pub struct NotificationWorker {
    receiver: mpsc::Receiver<BookingConfirmation>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::Receiver<BookingConfirmation>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self { receiver, dispatcher }
    }

    pub fn spawn(self) -> JoinHandle<WorkerStats> {
        tokio::spawn(self.run())
    }

    /// Runs until every publisher has been dropped and the queue is empty.
    #[instrument(skip(self), name = "notification_worker")]
    pub async fn run(mut self) -> WorkerStats {
        info!("Notification worker started");
        let mut stats = WorkerStats::default();

        while let Some(confirmation) = self.receiver.recv().await {
            debug!(
                "Dispatching confirmation for {} at {} {}",
                confirmation.client_name, confirmation.date, confirmation.slot
            );

            if self.dispatcher.dispatch(&confirmation).await {
                stats.delivered += 1;
                info!(
                    "Confirmation delivered to {} for {} {}",
                    confirmation.client_contact, confirmation.date, confirmation.slot
                );
            } else {
                stats.failed += 1;
                warn!(
                    "Confirmation delivery failed for {} ({} {}); booking is unaffected",
                    confirmation.client_contact, confirmation.date, confirmation.slot
                );
            }
        }

        info!(
            "Notification worker stopped: {} delivered, {} failed",
            stats.delivered, stats.failed
        );
        stats
    }
}

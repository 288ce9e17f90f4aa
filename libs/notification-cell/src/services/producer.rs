use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::{BookingConfirmation, NotificationError};

/// Create a bounded confirmation queue. The receiver goes to a `NotificationWorker`.
pub fn notification_channel(
    capacity: usize,
) -> (NotificationPublisher, mpsc::Receiver<BookingConfirmation>) {
    let capacity = capacity.max(1);
    let (sender, receiver) = mpsc::channel(capacity);
    (NotificationPublisher { sender, capacity }, receiver)
}

/// Write side of the confirmation queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationPublisher {
    sender: mpsc::Sender<BookingConfirmation>,
    capacity: usize,
}

impl NotificationPublisher {
    /// Hand a confirmation to the worker without waiting.
    pub fn publish(&self, confirmation: BookingConfirmation) -> Result<(), NotificationError> {
        match self.sender.try_send(confirmation) {
            Ok(()) => {
                debug!("Booking confirmation queued");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(NotificationError::QueueFull {
                capacity: self.capacity,
            }),
            Err(TrySendError::Closed(_)) => Err(NotificationError::QueueClosed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn confirmation() -> BookingConfirmation {
        BookingConfirmation {
            client_contact: "+5511999990000".to_string(),
            client_name: "Ana".to_string(),
            provider_name: "João Silva".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            slot: "09:00".to_string(),
            service: "Corte".to_string(),
        }
    }

    #[test]
    fn full_queue_is_reported() {
        let (publisher, _receiver) = notification_channel(1);
        publisher.publish(confirmation()).unwrap();

        let err = publisher.publish(confirmation()).unwrap_err();
        assert!(matches!(err, NotificationError::QueueFull { capacity: 1 }));
    }

    #[test]
    fn closed_queue_is_reported() {
        let (publisher, receiver) = notification_channel(4);
        drop(receiver);

        assert!(publisher.is_closed());
        assert!(matches!(
            publisher.publish(confirmation()),
            Err(NotificationError::QueueClosed)
        ));
    }
}

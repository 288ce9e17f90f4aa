use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Notification queue is closed")]
    QueueClosed,

    #[error("Dispatcher configuration error: {0}")]
    Configuration(String),
}

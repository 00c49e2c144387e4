//! Notification sinks.
//!
//! A `NotificationSink` delivers serialized [`Envelope`]s to the downstream
//! in-app notification channel. The in-memory sink keeps every delivery for
//! inspection; the SQS sink (feature `sqs`) publishes to a FIFO queue.

#[cfg(feature = "sqs")]
mod sqs;

#[cfg(feature = "sqs")]
pub use sqs::SqsNotificationSink;

use crate::models::Envelope;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur while dispatching a notification.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Failed to acquire lock on the sink.
    #[error("Failed to acquire lock on notification sink")]
    LockError,

    /// The notification could not be serialized.
    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),

    /// The channel rejected the notification.
    #[error("Notification rejected: {0}")]
    Rejected(String),

    /// The sink is misconfigured.
    #[error("Notification sink misconfigured: {0}")]
    Configuration(String),
}

/// Trait for notification sinks.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait NotificationSink: Send + Sync {
    /// Delivers one envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel rejects the delivery.
    fn dispatch(&self, envelope: &Envelope) -> Result<(), DispatchError>;
}

/// In-memory notification sink that records deliveries.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    delivered: Arc<RwLock<Vec<Envelope>>>,
}

impl InMemoryNotificationSink {
    /// Creates a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delivered: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new sink wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns every delivered envelope, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn delivered(&self) -> Result<Vec<Envelope>, DispatchError> {
        let delivered = self
            .delivered
            .read()
            .map_err(|_| DispatchError::LockError)?;
        Ok(delivered.clone())
    }

    /// Returns the number of delivered envelopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn count(&self) -> Result<usize, DispatchError> {
        let delivered = self
            .delivered
            .read()
            .map_err(|_| DispatchError::LockError)?;
        Ok(delivered.len())
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn dispatch(&self, envelope: &Envelope) -> Result<(), DispatchError> {
        let mut delivered = self
            .delivered
            .write()
            .map_err(|_| DispatchError::LockError)?;
        delivered.push(envelope.clone());
        Ok(())
    }
}

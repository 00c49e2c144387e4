//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::config::InsightConfig;
use shared::notify::{InMemoryNotificationSink, NotificationSink};
use shared::service::InsightService;
use shared::storage::{InMemoryInsightSource, InsightSource};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The insight service handlers delegate to.
    service: Arc<InsightService>,
}

impl AppState {
    /// Creates a new application state over the given source and sink.
    pub fn new(
        source: Arc<dyn InsightSource>,
        sink: Arc<dyn NotificationSink>,
        config: InsightConfig,
    ) -> Self {
        Self {
            service: Arc::new(InsightService::new(source, sink, config)),
        }
    }

    /// Creates a new application state with an in-memory source and sink.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self::in_memory(
            InMemoryInsightSource::new_shared(),
            InMemoryNotificationSink::new_shared(),
        )
    }

    /// Creates a state over in-memory collaborators the caller keeps handles to.
    #[must_use]
    pub fn in_memory(
        source: Arc<InMemoryInsightSource>,
        sink: Arc<InMemoryNotificationSink>,
    ) -> Self {
        Self::new(source, sink, InsightConfig::default())
    }

    /// Returns the insight service.
    #[must_use]
    pub fn service(&self) -> Arc<InsightService> {
        Arc::clone(&self.service)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}

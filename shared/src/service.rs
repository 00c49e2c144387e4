//! Insight request orchestration.
//!
//! `InsightService` runs one request end to end: fetch records from the
//! injected [`InsightSource`], normalize, roll up, assemble the report and,
//! for queued requests, publish it through the injected [`NotificationSink`].

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::config::InsightConfig;
use crate::models::{
    normalize_all, parse_request, InAppNotification, InputError, InsightRequest, QueueEvent,
};
use crate::notify::{DispatchError, NotificationSink};
use crate::rollup::{InsightReport, RollupEngine};
use crate::storage::{InsightQuery, InsightSource, SourceError};

/// Errors that can end an insight request.
#[derive(Debug, Error)]
pub enum InsightError {
    /// The inbound request is invalid.
    #[error("Invalid insight request: {0}")]
    Input(#[from] InputError),

    /// The insight source could not be queried.
    #[error("Insight source failed: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// The notification could not be delivered.
    #[error("Notification dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Outcome of a published rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Message id the notification was grouped under.
    pub message_id: String,
    /// Deduplication token of this delivery attempt.
    pub deduplication_id: String,
    /// The published report.
    pub report: InsightReport,
}

/// Runs insight requests against injected collaborators.
#[derive(Clone)]
pub struct InsightService {
    source: Arc<dyn InsightSource>,
    sink: Arc<dyn NotificationSink>,
    engine: RollupEngine,
    config: InsightConfig,
}

impl InsightService {
    /// Creates a service over the given source and sink.
    pub fn new(
        source: Arc<dyn InsightSource>,
        sink: Arc<dyn NotificationSink>,
        config: InsightConfig,
    ) -> Self {
        Self {
            source,
            sink,
            engine: RollupEngine::new(config.platform.clone()),
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Computes the report for a request without publishing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the source fails.
    pub fn get_insights(&self, request: &InsightRequest) -> Result<InsightReport, InsightError> {
        request.validate_request()?;
        let account = request.current_account()?;
        let query = InsightQuery::for_request(request)?;

        let raw = self.source.fetch(&query).map_err(|e| {
            tracing::error!(
                shop_id = request.shop_id,
                account_id = %account.id,
                error = %e,
                "Can not fetch insight records"
            );
            e
        })?;

        tracing::info!(
            shop_id = request.shop_id,
            account_id = %account.id,
            records = raw.len(),
            "Rolling up insight records"
        );

        let accounts = self.engine.run(normalize_all(raw));
        Ok(InsightReport::assemble(
            account,
            accounts,
            self.engine.platform(),
        ))
    }

    /// Computes and publishes the report for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the source fails, or the
    /// notification is not delivered.
    pub fn publish(&self, request: &InsightRequest) -> Result<Delivery, InsightError> {
        let report = self.get_insights(request)?;

        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| self.config.default_request_id.clone());
        let notification = InAppNotification::insights(
            request.shop_id,
            report.clone(),
            request_id,
            self.config.success_message.clone(),
            Utc::now(),
        );
        let envelope = notification.envelope().map_err(DispatchError::from)?;

        self.sink.dispatch(&envelope).map_err(|e| {
            tracing::error!(
                shop_id = request.shop_id,
                message_id = %envelope.group_id,
                error = %e,
                "Can not send insight notification"
            );
            e
        })?;

        tracing::info!(
            shop_id = request.shop_id,
            message_id = %envelope.group_id,
            campaigns = report.account().campaigns.len(),
            "Insight notification sent"
        );

        Ok(Delivery {
            message_id: envelope.group_id,
            deduplication_id: envelope.deduplication_id,
            report,
        })
    }

    /// Handles a queue delivery: parse, compute, publish.
    ///
    /// # Errors
    ///
    /// Returns an error if the delivery is malformed, the source fails, or
    /// the notification is not delivered.
    pub fn handle_event(&self, event: &QueueEvent) -> Result<Delivery, InsightError> {
        let request = parse_request(event).map_err(|e| {
            tracing::warn!(error = %e, "Rejecting queued insight request");
            e
        })?;
        self.publish(&request)
    }
}

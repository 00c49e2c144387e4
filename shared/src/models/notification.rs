//! Outbound in-app notification payload.
//!
//! The rollup result is published as an in-app notification. Deliveries are
//! grouped by `message_id` (stable per correlation id) while every attempt
//! carries its own deduplication token derived from the send time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rollup::InsightReport;

/// Topic the insight notifications are published under.
pub const INSIGHTS_TOPIC: &str = "shop:insights";

/// Prefix of every insight notification's message id.
pub const MESSAGE_ID_PREFIX: &str = "shop:insights:";

/// Notification type understood by the in-app channel.
pub const NOTIFICATION_TYPE: &str = "SA";

/// Subject line of insight notifications.
pub const NOTIFICATION_SUBJECT: &str = "Get shop insights";

/// Attributes attached to an insight notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAttributes {
    /// The rolled-up account.
    pub data: InsightReport,
    /// Correlation id of the originating request.
    #[serde(rename = "requestID")]
    pub request_id: String,
}

/// An in-app notification as sent to the notification queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InAppNotification {
    /// Shop the notification is addressed to.
    pub shop_id: i64,
    /// Message id, also used as the delivery group.
    pub message_id: String,
    /// Notification type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Notification topic.
    pub topic: String,
    /// Payload attributes.
    pub message_attributes: MessageAttributes,
    /// Send time.
    pub timestamp: DateTime<Utc>,
    /// Human-readable message.
    pub message: String,
    /// Subject line.
    pub subject: String,
}

impl InAppNotification {
    /// Builds the insight notification for a finished rollup.
    #[must_use]
    pub fn insights(
        shop_id: i64,
        report: InsightReport,
        request_id: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let request_id = request_id.into();
        Self {
            shop_id,
            message_id: format!("{MESSAGE_ID_PREFIX}{request_id}"),
            kind: NOTIFICATION_TYPE.to_string(),
            topic: INSIGHTS_TOPIC.to_string(),
            message_attributes: MessageAttributes {
                data: report,
                request_id,
            },
            timestamp,
            message: message.into(),
            subject: NOTIFICATION_SUBJECT.to_string(),
        }
    }

    /// Deduplication token for this delivery attempt.
    ///
    /// Derived from the send time in nanoseconds, so retries of identical
    /// content are distinct deliveries.
    #[must_use]
    pub fn deduplication_id(&self) -> String {
        self.timestamp
            .timestamp_nanos_opt()
            .unwrap_or_else(|| self.timestamp.timestamp_micros().saturating_mul(1_000))
            .to_string()
    }

    /// Serializes the notification into a queue envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn envelope(&self) -> Result<Envelope, serde_json::Error> {
        Ok(Envelope {
            group_id: self.message_id.clone(),
            deduplication_id: self.deduplication_id(),
            shop_id: self.shop_id,
            body: serde_json::to_string(self)?,
        })
    }
}

/// A serialized notification ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Delivery group, equal to the notification's message id.
    pub group_id: String,
    /// Per-attempt deduplication token.
    pub deduplication_id: String,
    /// Shop id, sent as a message attribute.
    pub shop_id: i64,
    /// JSON payload.
    pub body: String,
}

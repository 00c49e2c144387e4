//! SQS-backed notification sink.

use super::{DispatchError, NotificationSink};
use crate::models::Envelope;
use aws_sdk_sqs::types::MessageAttributeValue;

/// Publishes notifications to an SQS FIFO queue.
///
/// Each envelope becomes one message whose group id is the notification's
/// message id and whose deduplication id is the per-attempt token. The shop id
/// is attached as the `shopId` Number attribute.
#[derive(Clone)]
pub struct SqsNotificationSink {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsNotificationSink {
    /// Creates a sink for the given client and queue.
    #[must_use]
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    /// Creates a sink using the default AWS configuration chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue URL is empty.
    pub async fn from_env(queue_url: impl Into<String>) -> Result<Self, DispatchError> {
        let queue_url = queue_url.into();
        if queue_url.trim().is_empty() {
            return Err(DispatchError::Configuration(
                "notification queue URL is empty".to_string(),
            ));
        }

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Ok(Self::new(aws_sdk_sqs::Client::new(&aws_config), queue_url))
    }

    /// Returns the queue URL.
    #[must_use]
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

impl NotificationSink for SqsNotificationSink {
    fn dispatch(&self, envelope: &Envelope) -> Result<(), DispatchError> {
        let shop_id = MessageAttributeValue::builder()
            .data_type("Number")
            .string_value(envelope.shop_id.to_string())
            .build()
            .map_err(|e| DispatchError::Configuration(e.to_string()))?;

        let request = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_group_id(&envelope.group_id)
            .message_deduplication_id(&envelope.deduplication_id)
            .message_body(&envelope.body)
            .message_attributes("shopId", shop_id);

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(request.send())
        })
        .map_err(|e| DispatchError::Rejected(format!("can not send notification: {e}")))?;

        tracing::debug!(
            group_id = %envelope.group_id,
            message_id = output.message_id().unwrap_or_default(),
            "Notification sent"
        );
        Ok(())
    }
}

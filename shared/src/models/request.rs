//! Inbound insight requests and their queue envelope.
//!
//! A request arrives as the body of a single queue message. It names the shop,
//! the ad accounts being imported, which of them is current (`i_acc`), and the
//! sync instant whose records should be rolled up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Errors raised while reading an inbound request.
#[derive(Debug, Error)]
pub enum InputError {
    /// The delivery did not contain exactly one message.
    #[error("Expected exactly one queued message, got {0}")]
    NotSingleRecord(usize),

    /// The message body is not a valid request document.
    #[error("Malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The request violates a field constraint.
    #[error("Invalid request: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// `i_acc` does not point into `acc`.
    #[error("Account index {index} is out of range for {len} account(s)")]
    AccountIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of accounts in the request.
        len: usize,
    },
}

/// A queue delivery batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueEvent {
    /// Delivered messages.
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueMessage>,
}

/// A single queued message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    /// Queue-assigned message identifier.
    #[serde(default)]
    pub message_id: String,
    /// The raw message body.
    pub body: String,
}

impl QueueEvent {
    /// Wraps a single body into a delivery batch.
    #[must_use]
    pub fn single(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            records: vec![QueueMessage {
                message_id: message_id.into(),
                body: body.into(),
            }],
        }
    }
}

/// An ad account descriptor carried by the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountDescriptor {
    /// Ad account identifier.
    pub id: String,
    /// Ad account name.
    #[serde(default)]
    pub name: String,
    /// Account currency.
    #[serde(rename = "cur", default)]
    pub currency: String,
    /// Account timezone.
    #[serde(rename = "tz", default)]
    pub timezone: String,
    /// Campaign list filter, as sent by the scheduler.
    #[serde(rename = "cp_list", default)]
    pub campaign_list: String,
    /// Import day offset.
    #[serde(rename = "i_date", default)]
    pub import_date: i32,
}

/// A request to roll up one account's insights for one sync instant.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct InsightRequest {
    /// Shop (tenant) identifier.
    #[serde(rename = "sid")]
    #[validate(range(min = 1, message = "Shop id must be positive"))]
    pub shop_id: i64,

    /// Shop currency.
    #[serde(rename = "cur", default)]
    pub shop_currency: String,

    /// Ad accounts being imported for the shop.
    #[serde(rename = "acc")]
    #[validate(length(min = 1, message = "At least one account is required"))]
    pub accounts: Vec<AccountDescriptor>,

    /// Index into `accounts` of the account handled by this request.
    #[serde(rename = "i_acc", default)]
    pub account_index: usize,

    /// Whether this request is part of a progressive import.
    #[serde(rename = "progressive", default)]
    pub progressive_import: bool,

    /// Platform access token.
    #[serde(default)]
    pub access_token: String,

    /// Consumer identifier.
    #[serde(default)]
    pub consumer_id: i64,

    /// Requesting user name.
    #[serde(default)]
    pub name: String,

    /// Shop display name.
    #[serde(default)]
    pub shop_name: String,

    /// The instant whose records are rolled up.
    pub start_sync_time: DateTime<Utc>,

    /// Platform the request was issued for.
    #[serde(default)]
    pub platform: String,

    /// Correlation id for the resulting notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl std::fmt::Debug for InsightRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightRequest")
            .field("shop_id", &self.shop_id)
            .field("shop_currency", &self.shop_currency)
            .field("accounts", &self.accounts)
            .field("account_index", &self.account_index)
            .field("progressive_import", &self.progressive_import)
            .field("access_token", &"<redacted>")
            .field("consumer_id", &self.consumer_id)
            .field("name", &self.name)
            .field("shop_name", &self.shop_name)
            .field("start_sync_time", &self.start_sync_time)
            .field("platform", &self.platform)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl InsightRequest {
    /// Validates field constraints and the account index.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The shop id is not positive
    /// - The account list is empty
    /// - `i_acc` is outside the account list
    pub fn validate_request(&self) -> Result<(), InputError> {
        self.validate()?;
        if self.account_index >= self.accounts.len() {
            return Err(InputError::AccountIndexOutOfRange {
                index: self.account_index,
                len: self.accounts.len(),
            });
        }
        Ok(())
    }

    /// Returns the account this request targets.
    ///
    /// # Errors
    ///
    /// Returns an error if `i_acc` is outside the account list.
    pub fn current_account(&self) -> Result<&AccountDescriptor, InputError> {
        self.accounts
            .get(self.account_index)
            .ok_or(InputError::AccountIndexOutOfRange {
                index: self.account_index,
                len: self.accounts.len(),
            })
    }
}

/// Parses and validates the request carried by a queue delivery.
///
/// # Errors
///
/// Returns an error if the delivery does not hold exactly one message, the
/// body is not a request document, or the request fails validation.
pub fn parse_request(event: &QueueEvent) -> Result<InsightRequest, InputError> {
    let [message] = event.records.as_slice() else {
        return Err(InputError::NotSingleRecord(event.records.len()));
    };

    let request: InsightRequest = serde_json::from_str(&message.body)?;
    request.validate_request()?;
    Ok(request)
}

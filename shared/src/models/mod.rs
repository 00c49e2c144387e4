//! Data models for the Adinsight service.
//!
//! This module contains the raw and normalized metric records, the aggregate
//! hierarchy produced by the rollup, and the inbound/outbound message shapes.

pub mod aggregate;
pub mod notification;
pub mod record;
pub mod request;

pub use aggregate::{
    AccountAggregate, AdAggregate, AdGroupAggregate, CampaignAggregate, Ratios, Totals,
};
pub use notification::{Envelope, InAppNotification, MessageAttributes};
pub use record::{normalize_all, MetricRecord, RawMetricRecord, INACTIVE_STATUS};
pub use request::{
    parse_request, AccountDescriptor, InputError, InsightRequest, QueueEvent, QueueMessage,
};

//! Configuration module for Adinsight.
//!
//! This module contains the settings used when rolling up and publishing
//! insights.

pub mod insight;

pub use insight::{InsightConfig, DEFAULT_REQUEST_ID, DEFAULT_SUCCESS_MESSAGE};

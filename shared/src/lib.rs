//! Adinsight Shared Library
//!
//! This crate contains the record model, the hierarchical rollup engine and
//! the collaborator traits used by the Adinsight worker and CLI.
//!
//! # Modules
//!
//! - [`models`] - Metric records, aggregates, requests and notifications
//! - [`rollup`] - Four-pass rollup engine, derived ratios and report assembly
//! - [`storage`] - Insight source trait and implementations
//! - [`notify`] - Notification sink trait and implementations
//! - [`service`] - End-to-end request orchestration
//! - [`config`] - Rollup and notification settings
//!
//! # Example
//!
//! ```
//! use shared::models::{normalize_all, AccountDescriptor, RawMetricRecord};
//! use shared::rollup::{InsightReport, RollupEngine};
//!
//! let records = normalize_all(vec![RawMetricRecord::for_ad("a1", "g1", "c1", "x1")
//!     .with_delivery(15, 150)
//!     .with_spend(10.0)
//!     .with_purchases(1.0, 20.0)]);
//!
//! let engine = RollupEngine::default();
//! let account = AccountDescriptor { id: "x1".into(), ..Default::default() };
//! let report = InsightReport::assemble(&account, engine.run(records), engine.platform());
//!
//! assert_eq!(report.account().totals.clicks, 15);
//! assert!((report.account().ratios.roas - 2.0).abs() < 1e-9);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod models;
pub mod notify;
pub mod rollup;
pub mod service;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;

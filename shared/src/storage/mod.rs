//! Storage traits and implementations.
//!
//! This module provides the abstraction over the record store that supplies
//! raw ad metric records. The `InsightSource` trait allows different
//! implementations (in-memory, database-backed, etc.).

pub mod insight_source;

pub use insight_source::{
    ClickHouseInsightSource, InMemoryInsightSource, InsightQuery, InsightSource, SourceError,
};

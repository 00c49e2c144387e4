//! Insight source trait and implementations.
//!
//! Provides the `InsightSource` trait for fetching raw ad metric records for
//! one shop, account and sync window, with an in-memory implementation for
//! development and testing and a `ClickHouse`-backed implementation.

use crate::models::{InsightRequest, InputError, RawMetricRecord};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur while fetching insight records.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to acquire lock on the source.
    #[error("Failed to acquire lock on insight source")]
    LockError,

    /// The backing store could not be reached.
    #[error("Insight source unavailable: {0}")]
    Unavailable(String),

    /// The backing store rejected the query.
    #[error("Insight query failed: {0}")]
    Query(String),
}

/// Query parameters for fetching insight records.
///
/// Both window bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightQuery {
    /// Shop (tenant) the records belong to.
    pub shop_id: i64,

    /// Ad account to fetch records for.
    pub account_id: String,

    /// Window start (inclusive).
    pub start_time: DateTime<Utc>,

    /// Window end (inclusive).
    pub end_time: DateTime<Utc>,
}

impl InsightQuery {
    /// Creates a query matching exactly one instant.
    #[must_use]
    pub fn at(shop_id: i64, account_id: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self {
            shop_id,
            account_id: account_id.into(),
            start_time: instant,
            end_time: instant,
        }
    }

    /// Builds the query for a request's current account and sync time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request's account index is out of range.
    pub fn for_request(request: &InsightRequest) -> Result<Self, InputError> {
        let account = request.current_account()?;
        Ok(Self::at(
            request.shop_id,
            account.id.clone(),
            request.start_sync_time,
        ))
    }

    /// Sets the window end (inclusive).
    #[must_use]
    pub fn with_end_time(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = end;
        self
    }

    /// Returns true if the instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_time && instant <= self.end_time
    }
}

/// Trait for insight record sources.
///
/// Implementations must be thread-safe (Send + Sync). Records are returned
/// in the source's delivery order, which the rollup uses to pick first-seen
/// identity fields.
pub trait InsightSource: Send + Sync {
    /// Fetches raw records matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or queried.
    fn fetch(&self, query: &InsightQuery) -> Result<Vec<RawMetricRecord>, SourceError>;
}

/// A stored record with its routing fields.
#[derive(Debug, Clone)]
struct StoredRecord {
    shop_id: i64,
    date: DateTime<Utc>,
    record: RawMetricRecord,
}

/// In-memory insight source implementation.
#[derive(Debug, Default)]
pub struct InMemoryInsightSource {
    records: Arc<RwLock<Vec<StoredRecord>>>,
}

impl InMemoryInsightSource {
    /// Creates a new empty in-memory source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new in-memory source wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Stores a record for a shop and day.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn insert(
        &self,
        shop_id: i64,
        date: DateTime<Utc>,
        record: RawMetricRecord,
    ) -> Result<(), SourceError> {
        self.insert_batch(shop_id, date, vec![record])
    }

    /// Stores several records for a shop and day.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn insert_batch(
        &self,
        shop_id: i64,
        date: DateTime<Utc>,
        new_records: Vec<RawMetricRecord>,
    ) -> Result<(), SourceError> {
        let mut records = self.records.write().map_err(|_| SourceError::LockError)?;
        records.extend(new_records.into_iter().map(|record| StoredRecord {
            shop_id,
            date,
            record,
        }));
        Ok(())
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn count(&self) -> Result<usize, SourceError> {
        let records = self.records.read().map_err(|_| SourceError::LockError)?;
        Ok(records.len())
    }
}

impl InsightSource for InMemoryInsightSource {
    fn fetch(&self, query: &InsightQuery) -> Result<Vec<RawMetricRecord>, SourceError> {
        let records = self.records.read().map_err(|_| SourceError::LockError)?;

        Ok(records
            .iter()
            .filter(|stored| {
                stored.shop_id == query.shop_id
                    && query.contains(stored.date)
                    && stored.record.account_id.as_deref() == Some(query.account_id.as_str())
            })
            .map(|stored| stored.record.clone())
            .collect())
    }
}

/// `ClickHouse`-backed insight source.
///
/// Reads the `ad_insights` table, whose metric columns are nullable and whose
/// `date` column holds nanoseconds since the epoch.
#[derive(Clone)]
pub struct ClickHouseInsightSource {
    client: Arc<clickhouse::Client>,
}

impl ClickHouseInsightSource {
    /// Creates a new `ClickHouse` insight source with the given client.
    #[must_use]
    pub fn new(client: Arc<clickhouse::Client>) -> Self {
        Self { client }
    }

    /// Creates a new `ClickHouse` insight source wrapped in an Arc.
    #[must_use]
    pub fn new_shared(client: Arc<clickhouse::Client>) -> Arc<Self> {
        Arc::new(Self::new(client))
    }

    /// Helper to execute async operations synchronously.
    fn block_on<F, T>(future: F) -> Result<T, SourceError>
    where
        F: std::future::Future<Output = Result<T, clickhouse::error::Error>>,
    {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(future)
                .map_err(|e| {
                    if matches!(e, clickhouse::error::Error::Network(_)) {
                        SourceError::Unavailable(e.to_string())
                    } else {
                        SourceError::Query(e.to_string())
                    }
                })
        })
    }

    /// Builds the select for a query with every filter value bound.
    fn select_query(
        client: &clickhouse::Client,
        query: &InsightQuery,
    ) -> Result<clickhouse::query::Query, SourceError> {
        let start = nanos(query.start_time)?;
        let end = nanos(query.end_time)?;

        Ok(client
            .query(
                "SELECT ad_id, ad_name, ad_group_id, ad_group_name, campaign_id, campaign_name, \
                 account_id, account_name, clicks, spend, impressions, add_to_cart, purchases, \
                 purchases_value, assisted_purchase, direct_purchase, ad_status, ad_group_status, \
                 campaign_status, valid_parameters \
                 FROM ad_insights \
                 WHERE shop_id = ? AND account_id = ? AND date >= ? AND date <= ?",
            )
            .bind(query.shop_id)
            .bind(query.account_id.as_str())
            .bind(start)
            .bind(end))
    }
}

/// Nanoseconds since the epoch, as stored in the `date` column.
fn nanos(instant: DateTime<Utc>) -> Result<i64, SourceError> {
    instant.timestamp_nanos_opt().ok_or_else(|| {
        SourceError::Query(format!(
            "{} is outside the representable date range",
            instant.to_rfc3339()
        ))
    })
}

impl InsightSource for ClickHouseInsightSource {
    fn fetch(&self, query: &InsightQuery) -> Result<Vec<RawMetricRecord>, SourceError> {
        #[derive(clickhouse::Row, serde::Deserialize)]
        struct InsightRow {
            ad_id: Option<String>,
            ad_name: Option<String>,
            ad_group_id: Option<String>,
            ad_group_name: Option<String>,
            campaign_id: Option<String>,
            campaign_name: Option<String>,
            account_id: Option<String>,
            account_name: Option<String>,
            clicks: Option<u64>,
            spend: Option<f64>,
            impressions: Option<u64>,
            add_to_cart: Option<f64>,
            purchases: Option<f64>,
            purchases_value: Option<f64>,
            assisted_purchase: Option<f64>,
            direct_purchase: Option<f64>,
            ad_status: Option<String>,
            ad_group_status: Option<String>,
            campaign_status: Option<String>,
            valid_parameters: Option<bool>,
        }

        let select = Self::select_query(&self.client, query)?;
        tracing::debug!(sql = %select.sql_display(), "Fetching insight records");

        let rows: Vec<InsightRow> = Self::block_on(select.fetch_all::<InsightRow>())?;

        Ok(rows
            .into_iter()
            .map(|row| RawMetricRecord {
                ad_id: row.ad_id,
                ad_name: row.ad_name,
                ad_group_id: row.ad_group_id,
                ad_group_name: row.ad_group_name,
                campaign_id: row.campaign_id,
                campaign_name: row.campaign_name,
                account_id: row.account_id,
                account_name: row.account_name,
                clicks: row.clicks,
                spend: row.spend,
                impressions: row.impressions,
                add_to_cart: row.add_to_cart,
                purchases: row.purchases,
                purchases_value: row.purchases_value,
                assisted_purchase: row.assisted_purchase,
                direct_purchase: row.direct_purchase,
                ad_status: row.ad_status,
                ad_group_status: row.ad_group_status,
                campaign_status: row.campaign_status,
                valid_parameters: row.valid_parameters,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    fn record(ad: &str, account: &str) -> RawMetricRecord {
        RawMetricRecord::for_ad(ad, "g1", "c1", account)
    }

    #[test]
    fn test_new_source_is_empty() {
        let source = InMemoryInsightSource::new();
        assert_eq!(source.count().unwrap(), 0);
        assert!(source
            .fetch(&InsightQuery::at(1, "x1", day(1)))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_fetch_exact_instant() {
        let source = InMemoryInsightSource::new();
        source.insert(1, day(1), record("a1", "x1")).unwrap();
        source.insert(1, day(2), record("a2", "x1")).unwrap();

        let records = source.fetch(&InsightQuery::at(1, "x1", day(2))).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ad_id.as_deref(), Some("a2"));
    }

    #[test]
    fn test_fetch_filters_by_shop_and_account() {
        let source = InMemoryInsightSource::new();
        source
            .insert_batch(
                1,
                day(1),
                vec![record("a1", "x1"), record("a2", "x2"), record("a3", "x1")],
            )
            .unwrap();
        source.insert(2, day(1), record("a4", "x1")).unwrap();

        let records = source.fetch(&InsightQuery::at(1, "x1", day(1))).unwrap();

        let ids: Vec<_> = records.iter().filter_map(|r| r.ad_id.as_deref()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
    }

    #[test]
    fn test_fetch_inclusive_window() {
        let source = InMemoryInsightSource::new();
        for d in 1..=4 {
            source.insert(1, day(d), record("a1", "x1")).unwrap();
        }

        let query = InsightQuery::at(1, "x1", day(2)).with_end_time(day(3));
        assert_eq!(source.fetch(&query).unwrap().len(), 2);
    }

    fn select_sql(query: &InsightQuery) -> String {
        let client = clickhouse::Client::default();
        ClickHouseInsightSource::select_query(&client, query)
            .unwrap()
            .sql_display()
            .to_string()
    }

    #[test]
    fn test_select_binds_filters() {
        let sql = select_sql(&InsightQuery::at(7, "x1", day(1)));

        assert!(sql.contains("shop_id = 7 AND account_id = 'x1'"));
        assert!(sql.contains("date >= 1709251200000000000"));
        assert!(sql.ends_with("date <= 1709251200000000000"));
    }

    #[test]
    fn test_select_keeps_quotes_and_backslashes_inside_literal() {
        let sql = select_sql(&InsightQuery::at(7, "x\\' OR 1=1 --", day(1)));

        assert!(sql.contains("account_id = 'x\\\\\\' OR 1=1 --' AND date >= "));
        assert!(sql.contains("WHERE shop_id = 7 AND"));
        assert!(sql.ends_with("date <= 1709251200000000000"));
    }

    #[test]
    fn test_select_rejects_unrepresentable_instant() {
        let client = clickhouse::Client::default();
        let query = InsightQuery::at(7, "x1", DateTime::<Utc>::MAX_UTC);

        let result = ClickHouseInsightSource::select_query(&client, &query);
        assert!(matches!(result, Err(SourceError::Query(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ignore = "requires running ClickHouse instance"]
    async fn test_clickhouse_fetch() {
        let client = clickhouse::Client::default()
            .with_url("http://localhost:8123")
            .with_database("adinsight");
        let source = ClickHouseInsightSource::new(Arc::new(client));

        let result = source.fetch(&InsightQuery::at(1, "x1", day(1)));
        assert!(result.is_ok());
    }
}

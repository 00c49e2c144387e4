//! Hierarchical rollup of ad metric records.
//!
//! The engine runs four grouping passes over normalized records:
//!
//! 1. by `ad_id` into [`AdAggregate`]s
//! 2. by `(ad_group_id, campaign_id)` into [`AdGroupAggregate`]s
//! 3. by `campaign_id` into [`CampaignAggregate`]s
//! 4. by `account_id` into [`AccountAggregate`]s
//!
//! Each pass sums the additive metrics of its members, takes identity and
//! status fields from the first member encountered, derives [`Ratios`] from
//! the new sums, and moves the members into the parent in first-seen order.
//! Every pass is synchronous and total.
//!
//! # Example
//!
//! ```
//! use shared::models::{normalize_all, RawMetricRecord};
//! use shared::rollup::RollupEngine;
//!
//! let records = normalize_all(vec![
//!     RawMetricRecord::for_ad("a1", "g1", "c1", "x1").with_delivery(10, 100),
//!     RawMetricRecord::for_ad("a2", "g1", "c1", "x1").with_delivery(5, 50),
//! ]);
//!
//! let accounts = RollupEngine::new("pinterest").run(records);
//!
//! assert_eq!(accounts.len(), 1);
//! assert_eq!(accounts[0].totals.clicks, 15);
//! assert_eq!(accounts[0].campaigns[0].ad_groups[0].ads.len(), 2);
//! ```

pub mod ratios;
pub mod report;

pub use report::InsightReport;

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{
    AccountAggregate, AdAggregate, AdGroupAggregate, CampaignAggregate, MetricRecord, Ratios,
    Totals,
};

/// Platform tag used when none is configured.
pub const DEFAULT_PLATFORM: &str = "pinterest";

/// Splits items into groups keyed by `key`, in order of first appearance.
///
/// Members keep their relative input order within each group.
fn group_first_seen<T, K, F>(items: Vec<T>, key: F) -> Vec<Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<T>> = Vec::new();

    for item in items {
        let next = groups.len();
        let position = *positions.entry(key(&item)).or_insert(next);
        if position == next {
            groups.push(Vec::new());
        }
        groups[position].push(item);
    }

    groups
}

/// Parent identity carried upward from the first record of each ad.
#[derive(Debug, Clone)]
struct Lineage {
    ad_group_id: String,
    ad_group_name: String,
    ad_group_status: String,
    campaign_id: String,
    campaign_name: String,
    campaign_status: String,
    account_id: String,
    account_name: String,
}

impl From<&MetricRecord> for Lineage {
    fn from(record: &MetricRecord) -> Self {
        Self {
            ad_group_id: record.ad_group_id.clone(),
            ad_group_name: record.ad_group_name.clone(),
            ad_group_status: record.ad_group_status.clone(),
            campaign_id: record.campaign_id.clone(),
            campaign_name: record.campaign_name.clone(),
            campaign_status: record.campaign_status.clone(),
            account_id: record.account_id.clone(),
            account_name: record.account_name.clone(),
        }
    }
}

/// An aggregate together with the lineage of its first member.
struct Rolled<T> {
    aggregate: T,
    lineage: Lineage,
}

/// Pass 1: one aggregate per ad.
fn roll_ads(records: Vec<MetricRecord>) -> Vec<Rolled<AdAggregate>> {
    group_first_seen(records, |r| r.ad_id.clone())
        .into_iter()
        .filter_map(|members| {
            let first = members.first()?;
            let totals = members.iter().fold(Totals::default(), |mut acc, record| {
                acc.absorb(&Totals::from(record));
                acc
            });
            Some(Rolled {
                aggregate: AdAggregate {
                    ad_id: first.ad_id.clone(),
                    ad_name: first.ad_name.clone(),
                    ad_status: first.ad_status.clone(),
                    valid_parameters: first.valid_parameters,
                    totals,
                    ratios: Ratios::from_totals(&totals),
                },
                lineage: Lineage::from(first),
            })
        })
        .collect()
}

/// Pass 2: one aggregate per `(ad_group_id, campaign_id)` pair.
fn roll_ad_groups(ads: Vec<Rolled<AdAggregate>>) -> Vec<Rolled<AdGroupAggregate>> {
    group_first_seen(ads, |ad| {
        (ad.lineage.ad_group_id.clone(), ad.lineage.campaign_id.clone())
    })
    .into_iter()
    .filter_map(|members| {
        let lineage = members.first()?.lineage.clone();
        let totals = Totals::sum(members.iter().map(|m| &m.aggregate.totals));
        Some(Rolled {
            aggregate: AdGroupAggregate {
                ad_group_id: lineage.ad_group_id.clone(),
                ad_group_name: lineage.ad_group_name.clone(),
                ad_group_status: lineage.ad_group_status.clone(),
                totals,
                ratios: Ratios::from_totals(&totals),
                ads: members.into_iter().map(|m| m.aggregate).collect(),
            },
            lineage,
        })
    })
    .collect()
}

/// Pass 3: one aggregate per campaign.
fn roll_campaigns(groups: Vec<Rolled<AdGroupAggregate>>) -> Vec<Rolled<CampaignAggregate>> {
    group_first_seen(groups, |g| g.lineage.campaign_id.clone())
        .into_iter()
        .filter_map(|members| {
            let lineage = members.first()?.lineage.clone();
            let totals = Totals::sum(members.iter().map(|m| &m.aggregate.totals));
            Some(Rolled {
                aggregate: CampaignAggregate {
                    campaign_id: lineage.campaign_id.clone(),
                    campaign_name: lineage.campaign_name.clone(),
                    campaign_status: lineage.campaign_status.clone(),
                    totals,
                    ratios: Ratios::from_totals(&totals),
                    ad_groups: members.into_iter().map(|m| m.aggregate).collect(),
                },
                lineage,
            })
        })
        .collect()
}

/// Pass 4: one aggregate per account, tagged with the platform.
fn roll_accounts(
    campaigns: Vec<Rolled<CampaignAggregate>>,
    platform: &str,
) -> Vec<AccountAggregate> {
    group_first_seen(campaigns, |c| c.lineage.account_id.clone())
        .into_iter()
        .filter_map(|members| {
            let lineage = members.first()?.lineage.clone();
            let totals = Totals::sum(members.iter().map(|m| &m.aggregate.totals));
            Some(AccountAggregate {
                account_id: lineage.account_id,
                account_name: lineage.account_name,
                platform: platform.to_string(),
                totals,
                ratios: Ratios::from_totals(&totals),
                campaigns: members.into_iter().map(|m| m.aggregate).collect(),
            })
        })
        .collect()
}

/// Runs the four rollup passes.
#[derive(Debug, Clone)]
pub struct RollupEngine {
    platform: String,
}

impl RollupEngine {
    /// Creates an engine that tags accounts with `platform`.
    #[must_use]
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    /// Returns the platform tag.
    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Rolls normalized records up to one aggregate per account.
    ///
    /// Accounts, campaigns, ad groups and ads appear in the order their first
    /// record was encountered. An empty input yields an empty list.
    #[must_use]
    pub fn run(&self, records: Vec<MetricRecord>) -> Vec<AccountAggregate> {
        let record_count = records.len();

        let ads = roll_ads(records);
        let ad_groups = roll_ad_groups(ads);
        let campaigns = roll_campaigns(ad_groups);
        let accounts = roll_accounts(campaigns, &self.platform);

        tracing::debug!(
            records = record_count,
            accounts = accounts.len(),
            "Rollup complete"
        );

        accounts
    }
}

impl Default for RollupEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM)
    }
}

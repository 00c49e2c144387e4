//! Aggregate types produced by the rollup engine.
//!
//! The hierarchy is account → campaign → ad group → ad. Each level carries
//! its own [`Totals`] and the [`Ratios`] derived from them, and owns the list
//! of its children in first-seen order.

use serde::{Deserialize, Serialize};

use super::record::MetricRecord;

/// Additive metrics summed at every level of the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of clicks.
    pub clicks: u64,
    /// Amount spent.
    pub spend: f64,
    /// Number of impressions.
    pub impressions: u64,
    /// Add-to-cart events.
    pub add_to_cart: f64,
    /// Purchase events.
    pub purchases: f64,
    /// Revenue attributed to purchases.
    pub purchases_value: f64,
    /// Assisted purchases.
    pub assisted_purchase: f64,
    /// Direct purchases.
    pub direct_purchase: f64,
}

impl Totals {
    /// Adds another set of totals into this one.
    pub fn absorb(&mut self, other: &Self) {
        self.clicks = self.clicks.saturating_add(other.clicks);
        self.spend += other.spend;
        self.impressions = self.impressions.saturating_add(other.impressions);
        self.add_to_cart += other.add_to_cart;
        self.purchases += other.purchases;
        self.purchases_value += other.purchases_value;
        self.assisted_purchase += other.assisted_purchase;
        self.direct_purchase += other.direct_purchase;
    }

    /// Sums totals in iteration order.
    pub fn sum<'a>(items: impl IntoIterator<Item = &'a Self>) -> Self {
        items.into_iter().fold(Self::default(), |mut acc, t| {
            acc.absorb(t);
            acc
        })
    }
}

impl From<&MetricRecord> for Totals {
    fn from(record: &MetricRecord) -> Self {
        Self {
            clicks: record.clicks,
            spend: record.spend,
            impressions: record.impressions,
            add_to_cart: record.add_to_cart,
            purchases: record.purchases,
            purchases_value: record.purchases_value,
            assisted_purchase: record.assisted_purchase,
            direct_purchase: record.direct_purchase,
        }
    }
}

/// Efficiency ratios derived from a level's own [`Totals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    /// Click-through rate, in percent.
    pub ctr: f64,
    /// Spend per add-to-cart event.
    #[serde(rename = "cost_per_atc")]
    pub cost_per_add_to_cart: f64,
    /// Spend per purchase.
    pub cost_per_purchase: f64,
    /// Purchases per click, in percent.
    pub conversion_rate: f64,
    /// Return on ad spend.
    pub roas: f64,
}

/// Rollup of all records for one ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAggregate {
    /// Advertisement identifier.
    pub ad_id: String,
    /// Advertisement name.
    pub ad_name: String,
    /// Ad status.
    pub ad_status: String,
    /// Whether tracking parameters were valid.
    pub valid_parameters: bool,
    /// Summed metrics.
    #[serde(flatten)]
    pub totals: Totals,
    /// Derived ratios.
    #[serde(flatten)]
    pub ratios: Ratios,
}

/// Rollup of the ads sharing an ad group within one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdGroupAggregate {
    /// Ad group identifier.
    pub ad_group_id: String,
    /// Ad group name.
    pub ad_group_name: String,
    /// Ad group status.
    pub ad_group_status: String,
    /// Summed metrics.
    #[serde(flatten)]
    pub totals: Totals,
    /// Derived ratios.
    #[serde(flatten)]
    pub ratios: Ratios,
    /// Member ads in first-seen order.
    pub ads: Vec<AdAggregate>,
}

/// Rollup of the ad groups of one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignAggregate {
    /// Campaign identifier.
    pub campaign_id: String,
    /// Campaign name.
    pub campaign_name: String,
    /// Campaign status.
    pub campaign_status: String,
    /// Summed metrics.
    #[serde(flatten)]
    pub totals: Totals,
    /// Derived ratios.
    #[serde(flatten)]
    pub ratios: Ratios,
    /// Member ad groups in first-seen order.
    pub ad_groups: Vec<AdGroupAggregate>,
}

/// Rollup of every campaign of one ad account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountAggregate {
    /// Ad account identifier.
    pub account_id: String,
    /// Ad account name.
    pub account_name: String,
    /// Advertising platform the insights were collected from.
    pub platform: String,
    /// Summed metrics.
    #[serde(flatten)]
    pub totals: Totals,
    /// Derived ratios.
    #[serde(flatten)]
    pub ratios: Ratios,
    /// Member campaigns in first-seen order.
    pub campaigns: Vec<CampaignAggregate>,
}

impl AccountAggregate {
    /// Creates an aggregate for an account with no records.
    ///
    /// All sums and ratios are zero and the campaign list is empty.
    #[must_use]
    pub fn empty(
        account_id: impl Into<String>,
        account_name: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account_name: account_name.into(),
            platform: platform.into(),
            totals: Totals::default(),
            ratios: Ratios::default(),
            campaigns: Vec::new(),
        }
    }

    /// Iterates over every ad in the hierarchy.
    pub fn ads(&self) -> impl Iterator<Item = &AdAggregate> {
        self.campaigns
            .iter()
            .flat_map(|c| c.ad_groups.iter())
            .flat_map(|g| g.ads.iter())
    }
}

//! Raw and normalized ad metric records.
//!
//! A record describes one advertisement on one day. Records arrive from the
//! insight source with any subset of fields missing; [`MetricRecord`] is the
//! normalized form where every field has a concrete value.

use serde::{Deserialize, Serialize};

/// Status used for any ad, ad group, or campaign whose status is absent.
pub const INACTIVE_STATUS: &str = "INACTIVE";

/// A metric record as delivered by the insight source.
///
/// Every field is optional. The store's column names (`adset_*`,
/// `ad_account_*`) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMetricRecord {
    /// Advertisement identifier.
    pub ad_id: Option<String>,
    /// Advertisement display name.
    pub ad_name: Option<String>,
    /// Ad group (ad set) identifier.
    #[serde(alias = "adset_id")]
    pub ad_group_id: Option<String>,
    /// Ad group display name.
    #[serde(alias = "adset_name")]
    pub ad_group_name: Option<String>,
    /// Campaign identifier.
    pub campaign_id: Option<String>,
    /// Campaign display name.
    pub campaign_name: Option<String>,
    /// Ad account identifier.
    #[serde(alias = "ad_account_id")]
    pub account_id: Option<String>,
    /// Ad account display name.
    #[serde(alias = "ad_account_name")]
    pub account_name: Option<String>,
    /// Number of clicks.
    pub clicks: Option<u64>,
    /// Amount spent.
    pub spend: Option<f64>,
    /// Number of impressions.
    pub impressions: Option<u64>,
    /// Add-to-cart events.
    pub add_to_cart: Option<f64>,
    /// Purchase events.
    pub purchases: Option<f64>,
    /// Revenue attributed to purchases.
    pub purchases_value: Option<f64>,
    /// Purchases where the ad assisted the conversion.
    pub assisted_purchase: Option<f64>,
    /// Purchases attributed directly to the ad.
    pub direct_purchase: Option<f64>,
    /// Delivery status of the ad.
    pub ad_status: Option<String>,
    /// Delivery status of the ad group.
    #[serde(alias = "adset_status")]
    pub ad_group_status: Option<String>,
    /// Delivery status of the campaign.
    pub campaign_status: Option<String>,
    /// Whether the ad's tracking parameters were valid.
    pub valid_parameters: Option<bool>,
}

/// A normalized metric record.
///
/// Identity strings default to empty, additive metrics to zero, statuses to
/// [`INACTIVE_STATUS`] and `valid_parameters` to `false`. Field meanings match
/// [`RawMetricRecord`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub ad_id: String,
    pub ad_name: String,
    pub ad_group_id: String,
    pub ad_group_name: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub account_id: String,
    pub account_name: String,
    pub clicks: u64,
    pub spend: f64,
    pub impressions: u64,
    pub add_to_cart: f64,
    pub purchases: f64,
    pub purchases_value: f64,
    pub assisted_purchase: f64,
    pub direct_purchase: f64,
    pub ad_status: String,
    pub ad_group_status: String,
    pub campaign_status: String,
    pub valid_parameters: bool,
}

fn status_or_inactive(status: Option<String>) -> String {
    status.unwrap_or_else(|| INACTIVE_STATUS.to_string())
}

impl From<RawMetricRecord> for MetricRecord {
    fn from(raw: RawMetricRecord) -> Self {
        Self {
            ad_id: raw.ad_id.unwrap_or_default(),
            ad_name: raw.ad_name.unwrap_or_default(),
            ad_group_id: raw.ad_group_id.unwrap_or_default(),
            ad_group_name: raw.ad_group_name.unwrap_or_default(),
            campaign_id: raw.campaign_id.unwrap_or_default(),
            campaign_name: raw.campaign_name.unwrap_or_default(),
            account_id: raw.account_id.unwrap_or_default(),
            account_name: raw.account_name.unwrap_or_default(),
            clicks: raw.clicks.unwrap_or(0),
            spend: raw.spend.unwrap_or(0.0),
            impressions: raw.impressions.unwrap_or(0),
            add_to_cart: raw.add_to_cart.unwrap_or(0.0),
            purchases: raw.purchases.unwrap_or(0.0),
            purchases_value: raw.purchases_value.unwrap_or(0.0),
            assisted_purchase: raw.assisted_purchase.unwrap_or(0.0),
            direct_purchase: raw.direct_purchase.unwrap_or(0.0),
            ad_status: status_or_inactive(raw.ad_status),
            ad_group_status: status_or_inactive(raw.ad_group_status),
            campaign_status: status_or_inactive(raw.campaign_status),
            valid_parameters: raw.valid_parameters.unwrap_or(false),
        }
    }
}

/// Normalizes a batch of raw records, preserving their order.
#[must_use]
pub fn normalize_all(raw: Vec<RawMetricRecord>) -> Vec<MetricRecord> {
    raw.into_iter().map(MetricRecord::from).collect()
}

impl RawMetricRecord {
    /// Creates an empty raw record for the given ad hierarchy.
    #[must_use]
    pub fn for_ad(
        ad_id: impl Into<String>,
        ad_group_id: impl Into<String>,
        campaign_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            ad_id: Some(ad_id.into()),
            ad_group_id: Some(ad_group_id.into()),
            campaign_id: Some(campaign_id.into()),
            account_id: Some(account_id.into()),
            ..Self::default()
        }
    }

    /// Sets clicks and impressions.
    #[must_use]
    pub fn with_delivery(mut self, clicks: u64, impressions: u64) -> Self {
        self.clicks = Some(clicks);
        self.impressions = Some(impressions);
        self
    }

    /// Sets the amount spent.
    #[must_use]
    pub fn with_spend(mut self, spend: f64) -> Self {
        self.spend = Some(spend);
        self
    }

    /// Sets purchase count and purchase value.
    #[must_use]
    pub fn with_purchases(mut self, purchases: f64, value: f64) -> Self {
        self.purchases = Some(purchases);
        self.purchases_value = Some(value);
        self
    }

    /// Sets add-to-cart events.
    #[must_use]
    pub fn with_add_to_cart(mut self, add_to_cart: f64) -> Self {
        self.add_to_cart = Some(add_to_cart);
        self
    }

    /// Sets assisted and direct purchase attribution.
    #[must_use]
    pub fn with_attribution(mut self, assisted: f64, direct: f64) -> Self {
        self.assisted_purchase = Some(assisted);
        self.direct_purchase = Some(direct);
        self
    }
}

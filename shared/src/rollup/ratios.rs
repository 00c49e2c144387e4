//! Derived efficiency ratios.
//!
//! Every ratio is computed from a level's own summed totals and is zero when
//! its guard does not hold. The conversion-rate guard checks `purchases`, not
//! `clicks`.

use crate::models::{Ratios, Totals};

/// Converts a quotient to a ratio, collapsing non-finite results to zero.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Click-through rate in percent. Zero without impressions.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn ctr(totals: &Totals) -> f64 {
    if totals.impressions > 0 {
        (totals.clicks as f64 / totals.impressions as f64) * 100.0
    } else {
        0.0
    }
}

/// Spend per add-to-cart event. Zero without add-to-cart events.
#[must_use]
pub fn cost_per_add_to_cart(totals: &Totals) -> f64 {
    if totals.add_to_cart > 0.0 {
        totals.spend / totals.add_to_cart
    } else {
        0.0
    }
}

/// Spend per purchase. Zero without purchases.
#[must_use]
pub fn cost_per_purchase(totals: &Totals) -> f64 {
    if totals.purchases > 0.0 {
        totals.spend / totals.purchases
    } else {
        0.0
    }
}

/// Purchases per click in percent. Zero without purchases.
///
/// Purchases recorded against zero clicks yield zero rather than infinity.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn conversion_rate(totals: &Totals) -> f64 {
    if totals.purchases > 0.0 {
        finite_or_zero((totals.purchases / totals.clicks as f64) * 100.0)
    } else {
        0.0
    }
}

/// Purchase value per unit of spend. Zero without spend.
#[must_use]
pub fn roas(totals: &Totals) -> f64 {
    if totals.spend > 0.0 {
        totals.purchases_value / totals.spend
    } else {
        0.0
    }
}

impl Ratios {
    /// Derives all ratios from summed totals.
    #[must_use]
    pub fn from_totals(totals: &Totals) -> Self {
        Self {
            ctr: ctr(totals),
            cost_per_add_to_cart: cost_per_add_to_cart(totals),
            cost_per_purchase: cost_per_purchase(totals),
            conversion_rate: conversion_rate(totals),
            roas: roas(totals),
        }
    }
}

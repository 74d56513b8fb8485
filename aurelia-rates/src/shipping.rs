use aurelia_shared::Address;
use serde::{Deserialize, Serialize};

use crate::zones::{RateTable, ShippingMethod};

pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 150_00;

/// A priced, time-estimated shipping option, not yet committed to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub method: ShippingMethod,
    pub rate_cents: i64,
    pub estimated_days: String,
}

/// Derives a full quote set for a destination. Deterministic in its inputs
/// and the injected table; never fails.
#[derive(Debug, Clone)]
pub struct ShippingCalculator {
    table: RateTable,
    free_shipping_threshold_cents: i64,
}

impl ShippingCalculator {
    pub fn new(table: RateTable, free_shipping_threshold_cents: i64) -> Self {
        Self {
            table,
            free_shipping_threshold_cents,
        }
    }

    /// Step function over item count: +10% per full group of 5 items.
    pub fn weight_factor(total_items: u32) -> f64 {
        1.0 + (total_items / 5) as f64 * 0.1
    }

    /// One quote per method, in [ground, two-day, overnight] order.
    pub fn quotes(
        &self,
        destination: &Address,
        total_items: u32,
        subtotal_cents: i64,
    ) -> Vec<ShippingQuote> {
        ShippingMethod::all()
            .into_iter()
            .map(|method| self.quote(method, destination, total_items, subtotal_cents))
            .collect()
    }

    /// The quote for one specific method. Orders at or above the
    /// free-shipping threshold get ground for free; the premium methods
    /// keep their weighted rate.
    pub fn quote(
        &self,
        method: ShippingMethod,
        destination: &Address,
        total_items: u32,
        subtotal_cents: i64,
    ) -> ShippingQuote {
        let zone = self.table.zone_for(&destination.state);
        let free_ground = subtotal_cents >= self.free_shipping_threshold_cents;

        let rate_cents = if free_ground && method == ShippingMethod::Ground {
            0
        } else {
            let base = self.table.base_rate_cents(method, zone);
            round_to_dollar(base as f64 * Self::weight_factor(total_items))
        };

        ShippingQuote {
            method,
            rate_cents,
            estimated_days: self.table.estimated_days(method, zone).to_string(),
        }
    }
}

impl Default for ShippingCalculator {
    fn default() -> Self {
        Self::new(RateTable::default(), DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS)
    }
}

/// Shipping rates are quoted in whole dollars.
fn round_to_dollar(cents: f64) -> i64 {
    (cents / 100.0).round() as i64 * 100
}

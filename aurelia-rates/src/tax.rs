use aurelia_shared::Address;
use serde::{Deserialize, Serialize};

use crate::zones::RateTable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxResult {
    /// Combined state + local rate, 0 ≤ r ≤ 1.
    pub rate: f64,
    pub amount_cents: i64,
}

/// Combined state + local sales tax for a destination. Unmapped states take
/// the maximum known state rate, mirroring the shipping fallback: an
/// unknown location is never treated as tax-free.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    table: RateTable,
}

impl TaxCalculator {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    pub fn calculate(&self, destination: &Address, subtotal_cents: i64) -> TaxResult {
        let state_rate = self
            .table
            .state_tax_rate(&destination.state)
            .unwrap_or_else(|| self.table.max_state_tax_rate());
        let local_rate = self.table.local_tax_rate(&destination.zip_code);
        let rate = state_rate + local_rate;

        TaxResult {
            rate,
            amount_cents: (subtotal_cents as f64 * rate).round() as i64,
        }
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(RateTable::default())
    }
}

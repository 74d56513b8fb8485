use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Shipping zones by distance from the Newberg, OR (97132) origin. Anything
/// not explicitly mapped lands in the Default zone, which carries the
/// highest rates: unmapped destinations are never silently cheap or
/// untaxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Zone1,
    Zone2,
    Zone3,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShippingMethod {
    Ground,
    TwoDay,
    Overnight,
}

impl ShippingMethod {
    pub const fn all() -> [ShippingMethod; 3] {
        [
            ShippingMethod::Ground,
            ShippingMethod::TwoDay,
            ShippingMethod::Overnight,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShippingMethod::Ground => "Ground Shipping",
            ShippingMethod::TwoDay => "2-Day Express",
            ShippingMethod::Overnight => "Overnight Delivery",
        }
    }
}

/// One value per zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneValues<T> {
    pub zone1: T,
    pub zone2: T,
    pub zone3: T,
    pub default: T,
}

impl<T> ZoneValues<T> {
    pub fn for_zone(&self, zone: Zone) -> &T {
        match zone {
            Zone::Zone1 => &self.zone1,
            Zone::Zone2 => &self.zone2,
            Zone::Zone3 => &self.zone3,
            Zone::Default => &self.default,
        }
    }
}

/// Base rate and transit estimate for one shipping method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodTable {
    pub rates_cents: ZoneValues<i64>,
    pub estimated_days: ZoneValues<String>,
}

/// Static rate data, injected as configuration rather than hard-coded at
/// the call sites so tables can change without touching calculation logic.
/// `Default` carries the standard tables; the config layer may override any
/// section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub zone1_states: Vec<String>,
    pub zone2_states: Vec<String>,
    pub zone3_states: Vec<String>,
    pub ground: MethodTable,
    pub two_day: MethodTable,
    pub overnight: MethodTable,
    /// State-level sales tax rates keyed by two-letter code.
    pub state_tax_rates: HashMap<String, f64>,
    /// Additional local tax rates keyed by ZIP code.
    pub local_tax_rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn zone_for(&self, state: &str) -> Zone {
        if self.zone1_states.iter().any(|s| s == state) {
            Zone::Zone1
        } else if self.zone2_states.iter().any(|s| s == state) {
            Zone::Zone2
        } else if self.zone3_states.iter().any(|s| s == state) {
            Zone::Zone3
        } else {
            Zone::Default
        }
    }

    pub fn method_table(&self, method: ShippingMethod) -> &MethodTable {
        match method {
            ShippingMethod::Ground => &self.ground,
            ShippingMethod::TwoDay => &self.two_day,
            ShippingMethod::Overnight => &self.overnight,
        }
    }

    pub fn base_rate_cents(&self, method: ShippingMethod, zone: Zone) -> i64 {
        *self.method_table(method).rates_cents.for_zone(zone)
    }

    pub fn estimated_days(&self, method: ShippingMethod, zone: Zone) -> &str {
        self.method_table(method).estimated_days.for_zone(zone)
    }

    pub fn state_tax_rate(&self, state: &str) -> Option<f64> {
        self.state_tax_rates.get(state).copied()
    }

    /// Most conservative fallback for unmapped states.
    pub fn max_state_tax_rate(&self) -> f64 {
        self.state_tax_rates
            .values()
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn local_tax_rate(&self, zip_code: &str) -> f64 {
        self.local_tax_rates.get(zip_code).copied().unwrap_or(0.0)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let states = |codes: &[&str]| -> Vec<String> {
            codes.iter().map(|s| s.to_string()).collect()
        };
        let days = |z1: &str, z2: &str, z3: &str, d: &str| ZoneValues {
            zone1: z1.to_string(),
            zone2: z2.to_string(),
            zone3: z3.to_string(),
            default: d.to_string(),
        };

        Self {
            zone1_states: states(&["OR", "WA", "ID"]),
            zone2_states: states(&["CA", "NV", "MT", "WY"]),
            zone3_states: states(&["AZ", "UT", "NM", "CO"]),
            ground: MethodTable {
                rates_cents: ZoneValues {
                    zone1: 15_00,
                    zone2: 20_00,
                    zone3: 25_00,
                    default: 30_00,
                },
                estimated_days: days("2-3", "3-5", "5-7", "7-10"),
            },
            two_day: MethodTable {
                rates_cents: ZoneValues {
                    zone1: 25_00,
                    zone2: 35_00,
                    zone3: 45_00,
                    default: 50_00,
                },
                estimated_days: days("2", "2", "2", "2"),
            },
            overnight: MethodTable {
                rates_cents: ZoneValues {
                    zone1: 45_00,
                    zone2: 60_00,
                    zone3: 75_00,
                    default: 90_00,
                },
                estimated_days: days("1", "1", "1", "1"),
            },
            state_tax_rates: {
                let mut m = HashMap::new();
                m.insert("OR".to_string(), 0.00); // Oregon has no sales tax
                m.insert("WA".to_string(), 0.065);
                m.insert("CA".to_string(), 0.0725);
                m.insert("NV".to_string(), 0.0685);
                m.insert("ID".to_string(), 0.06);
                m.insert("AZ".to_string(), 0.056);
                m.insert("UT".to_string(), 0.0485);
                m.insert("CO".to_string(), 0.029);
                m
            },
            local_tax_rates: {
                let mut m = HashMap::new();
                m.insert("97132".to_string(), 0.00); // Newberg, OR
                m.insert("98101".to_string(), 0.036); // Seattle, WA
                m.insert("90001".to_string(), 0.0275); // Los Angeles, CA
                m
            },
        }
    }
}

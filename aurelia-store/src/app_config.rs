use aurelia_rates::zones::RateTable;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
    /// Shipping/tax tables; overridable per deployment without code changes.
    pub rates: RateTable,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "aurelia-dev-secret".to_string(),
            jwt_expiration_seconds: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BusinessRules {
    pub free_shipping_threshold_cents: i64,
    /// Two-letter brand prefix on order numbers.
    pub order_prefix: String,
    pub payment: PaymentRules,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold_cents: 150_00,
            order_prefix: "AU".to_string(),
            payment: PaymentRules::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaymentRules {
    /// Simulated authorization approval probability, 0.0..=1.0.
    pub success_rate: f64,
    pub latency_ms: u64,
    /// Authorization wait bound; expiry maps to a failed outcome.
    pub timeout_ms: u64,
}

impl Default for PaymentRules {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            latency_ms: 1500,
            timeout_ms: 5000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Add in the current environment file, defaulting to 'development'
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file that shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of AURELIA)
            .add_source(config::Environment::with_prefix("AURELIA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

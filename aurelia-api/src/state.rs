use std::sync::Arc;

use aurelia_core::repository::{UserRepository, WishlistRepository};
use aurelia_order::{CheckoutService, OrderLedger};
use aurelia_store::Telemetry;

use crate::auth::LoginThrottle;
use crate::middleware::rate_limit::RateLimiter;
use crate::notify::Mailer;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub wishlist: Arc<dyn WishlistRepository>,
    pub checkout: Arc<CheckoutService>,
    pub ledger: Arc<OrderLedger>,
    pub telemetry: Arc<Telemetry>,
    pub mailer: Arc<dyn Mailer>,
    pub auth: AuthConfig,
    pub rate_limiter: Arc<RateLimiter>,
    pub login_throttle: Arc<LoginThrottle>,
}

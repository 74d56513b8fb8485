use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aurelia_api::middleware::rate_limit::RateLimiter;
use aurelia_api::notify::ConsoleMailer;
use aurelia_api::{
    app,
    auth::LoginThrottle,
    state::{AppState, AuthConfig},
};
use aurelia_order::{CheckoutService, OrderLedger, SimulatedGateway};
use aurelia_rates::{ShippingCalculator, TaxCalculator};
use aurelia_store::{
    MemoryOrderRepository, MemoryUserRepository, MemoryWishlistRepository, Telemetry,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aurelia_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = aurelia_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Aurelia API on port {}", config.server.port);

    let rules = &config.business_rules;

    let order_repo = Arc::new(MemoryOrderRepository::new());
    let ledger = Arc::new(OrderLedger::new(order_repo, rules.order_prefix.clone()));

    let gateway = Arc::new(SimulatedGateway::new(
        rules.payment.success_rate,
        Duration::from_millis(rules.payment.latency_ms),
    ));
    let checkout = Arc::new(CheckoutService::new(
        ShippingCalculator::new(config.rates.clone(), rules.free_shipping_threshold_cents),
        TaxCalculator::new(config.rates.clone()),
        gateway,
        ledger.clone(),
        Duration::from_millis(rules.payment.timeout_ms),
    ));

    let app_state = AppState {
        users: Arc::new(MemoryUserRepository::with_demo_user()),
        wishlist: Arc::new(MemoryWishlistRepository::new()),
        checkout,
        ledger,
        telemetry: Arc::new(Telemetry::new()),
        mailer: Arc::new(ConsoleMailer::new("http://localhost:3000")),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        rate_limiter: Arc::new(RateLimiter::new(100, Duration::from_secs(60))),
        login_throttle: Arc::new(LoginThrottle::new(5, Duration::from_secs(15 * 60))),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

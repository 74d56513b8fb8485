pub mod app_config;
pub mod order_repo;
pub mod telemetry;
pub mod user_repo;
pub mod wishlist_repo;

pub use order_repo::MemoryOrderRepository;
pub use telemetry::Telemetry;
pub use user_repo::MemoryUserRepository;
pub use wishlist_repo::MemoryWishlistRepository;

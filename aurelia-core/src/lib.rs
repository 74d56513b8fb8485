pub mod identity;
pub mod payment;
pub mod repository;

pub use identity::User;
pub use payment::{
    BillingDetails, CardBrand, CardDetails, CardError, PaymentGateway, PaymentOutcome,
    PaymentStatus,
};
pub use repository::{UserRepository, WishlistRepository};

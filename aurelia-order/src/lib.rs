pub mod checkout;
pub mod gateway;
pub mod ledger;
pub mod models;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutil;

pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutRequest, CheckoutService};
pub use gateway::{FixedGateway, SimulatedGateway};
pub use ledger::{LedgerError, OrderLedger};
pub use models::{CartItem, Order, OrderStatus, OrderSummary, ShippingDetails, TrackingInfo};
pub use repository::OrderRepository;

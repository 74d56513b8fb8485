pub mod models;
pub mod pii;

pub use models::address::Address;
pub use pii::Masked;

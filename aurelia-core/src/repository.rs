use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::identity::User;

/// Repository trait for account data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(
        &self,
        user: User,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    /// Consume a verification token; returns false if no account holds it.
    async fn mark_verified(
        &self,
        token: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Attach a password-reset token to a verified account; returns false
    /// if the email is unknown or unverified.
    async fn store_reset_token(
        &self,
        email: &str,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Consume an unexpired reset token and replace the password hash;
    /// returns false if the token is unknown or expired.
    async fn reset_password(
        &self,
        token: &str,
        new_hash: String,
        new_salt: String,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for per-customer wishlists
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Returns false if the product was already present.
    async fn add(
        &self,
        customer_id: &str,
        product_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Returns false if the product was not present.
    async fn remove(
        &self,
        customer_id: &str,
        product_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    async fn list(
        &self,
        customer_id: &str,
    ) -> Result<Vec<u64>, Box<dyn std::error::Error + Send + Sync>>;
}

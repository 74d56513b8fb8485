use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A storefront account. Passwords are stored as sha256(password + salt);
/// this is mock authentication by design, not a hardened credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub salt: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_expires: Option<DateTime<Utc>>,
}

impl User {
    /// New unverified account with a fresh salt and verification token.
    pub fn new(email: String, name: String, password: &str) -> Self {
        let salt = generate_token();
        Self {
            id: generate_token(),
            email,
            name,
            password_hash: hash_password(password, &salt),
            salt,
            is_verified: false,
            verification_token: Some(generate_token()),
            reset_token: None,
            reset_expires: None,
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password, &self.salt) == self.password_hash
    }
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Opaque 32-hex-char token for verification and reset links.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

use async_trait::async_trait;
use aurelia_core::identity::{hash_password, User};
use aurelia_core::repository::UserRepository;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// In-memory account store seeded with the demo user, standing in for a
/// real user database.
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    /// Store preloaded with the demo account (john@example.com / demo123).
    pub fn with_demo_user() -> Self {
        let salt = "initial-salt".to_string();
        let demo = User {
            id: "1".to_string(),
            email: "john@example.com".to_string(),
            name: "John Doe".to_string(),
            password_hash: hash_password("demo123", &salt),
            salt,
            is_verified: true,
            verification_token: None,
            reset_token: None,
            reset_expires: None,
        };
        Self {
            users: RwLock::new(vec![demo]),
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::with_demo_user()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        user: User,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.users.write().await.push(user);
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn mark_verified(
        &self,
        token: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut users = self.users.write().await;
        match users
            .iter_mut()
            .find(|u| u.verification_token.as_deref() == Some(token))
        {
            Some(user) => {
                user.is_verified = true;
                user.verification_token = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn store_reset_token(
        &self,
        email: &str,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut users = self.users.write().await;
        match users
            .iter_mut()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.is_verified)
        {
            Some(user) => {
                user.reset_token = Some(token.to_string());
                user.reset_expires = Some(expires);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_password(
        &self,
        token: &str,
        new_hash: String,
        new_salt: String,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let now = Utc::now();
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| {
            u.reset_token.as_deref() == Some(token)
                && u.reset_expires.map(|exp| exp > now).unwrap_or(false)
        }) {
            Some(user) => {
                user.password_hash = new_hash;
                user.salt = new_salt;
                user.reset_token = None;
                user.reset_expires = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use aurelia_core::identity::{generate_token, hash_password, User};

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

// ============================================================================
// Login throttling
// ============================================================================

struct Attempt {
    count: u32,
    last_attempt: Instant,
}

/// Per-email attempt counter: after `max_attempts` tries the address is
/// locked out until `lockout` has elapsed.
pub struct LoginThrottle {
    max_attempts: u32,
    lockout: Duration,
    attempts: Mutex<HashMap<String, Attempt>>,
}

impl LoginThrottle {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            max_attempts,
            lockout,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Count one attempt for `email`; false while locked out.
    pub fn check(&self, email: &str) -> bool {
        let now = Instant::now();
        let mut attempts = match self.attempts.lock() {
            Ok(attempts) => attempts,
            Err(poisoned) => poisoned.into_inner(),
        };

        let entry = attempts.entry(email.to_string()).or_insert(Attempt {
            count: 0,
            last_attempt: now,
        });

        if entry.count >= self.max_attempts {
            if now.duration_since(entry.last_attempt) < self.lockout {
                return false;
            }
            // Lockout elapsed, start a fresh window.
            entry.count = 0;
        }

        entry.count += 1;
        entry.last_attempt = now;
        true
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    email: String,
    password: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    id: String,
    email: String,
    name: String,
    is_verified: bool,
}

#[derive(Debug, Deserialize)]
struct VerifyEmailRequest {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ForgotPasswordRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
struct ResetPasswordRequest {
    token: String,
    new_password: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/verify-email", post(verify_email))
        .route("/v1/auth/forgot-password", post(forgot_password))
        .route("/v1/auth/reset-password", post(reset_password))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if !state.login_throttle.check(&req.email) {
        return Err(AppError::TooManyRequestsError(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let user = match user {
        Some(user) if user.verify_password(&req.password) => user,
        // Same message either way so probes can't tell accounts apart.
        _ => {
            return Err(AppError::AuthenticationError(
                "Invalid email or password".to_string(),
            ))
        }
    };

    if !user.is_verified {
        return Err(AppError::AuthenticationError(
            "Please verify your email address".to_string(),
        ));
    }

    let claims = CustomerClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        exp: (Utc::now() + chrono::Duration::seconds(state.auth.expiration as i64)).timestamp()
            as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let existing = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if existing.is_some() {
        return Err(AppError::ConflictError(
            "Email already registered".to_string(),
        ));
    }

    let user = User::new(req.email, req.name, &req.password);
    let verification_token = user.verification_token.clone().unwrap_or_default();
    let response = RegisterResponse {
        id: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        is_verified: user.is_verified,
    };

    state
        .users
        .create(user)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if let Err(e) = state
        .mailer
        .send_verification(&response.email, &verification_token)
        .await
    {
        tracing::warn!(email = %response.email, error = %e, "verification email failed");
    }

    Ok((StatusCode::CREATED, Json(response)))
}

async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let verified = state
        .users
        .mark_verified(&req.token)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if verified {
        Ok(Json(json!({ "verified": true })))
    } else {
        Err(AppError::ValidationError(
            "Invalid or expired verification token".to_string(),
        ))
    }
}

/// Always reports success so the endpoint cannot be used to enumerate
/// registered addresses.
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = generate_token();
    let expires = Utc::now() + chrono::Duration::hours(1);

    let stored = state
        .users
        .store_reset_token(&req.email, &token, expires)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if stored {
        if let Err(e) = state.mailer.send_password_reset(&req.email, &token).await {
            tracing::warn!(email = %req.email, error = %e, "password reset email failed");
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "If an account exists for that address, a reset email has been sent"
    })))
}

async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let salt = generate_token();
    let new_hash = hash_password(&req.new_password, &salt);

    let reset = state
        .users
        .reset_password(&req.token, new_hash, salt)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if reset {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(AppError::ValidationError(
            "Invalid or expired reset token".to_string(),
        ))
    }
}

//! # Authentication
//!
//! One configured account, argon2-verified, with JWT bearer sessions.
//!
//! ```text
//! POST /api/auth/login ──► AuthService::sign_in ──► Session { accessToken }
//!                                                         │
//! GET /api/... Authorization: Bearer <token>              │
//!      │                                                  │
//!      ▼                                                  │
//! require_auth middleware ◄───── JwtManager::validate ◄───┘
//!      │
//!      ▼
//! handler(AuthUser(claims), ...)
//! ```

mod jwt;
mod middleware;
mod provider;
mod service;

pub use jwt::{extract_bearer_token, Claims, JwtManager};
pub use middleware::{require_auth, AuthUser};
pub use provider::{hash_password, verify_password, IdentityProvider, LocalIdentityProvider};
pub use service::{AuthService, Session, SignInRequest};

use loom_core::auth::AuthProviderError;

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Rejected by the identity provider (or the email is not authorized).
    #[error("Sign-in failed: {}", .0.code())]
    Provider(AuthProviderError),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Failed to generate token: {0}")]
    TokenIssue(String),
}

//! # Identity Providers
//!
//! Verifies a password for the configured account.
//!
//! ```text
//! AuthService::sign_in
//!      │  email already checked against the authorized account
//!      ▼
//! dyn IdentityProvider::verify(email, password)
//!      │
//!      ├── LocalIdentityProvider (argon2 hash of LOOM_AUTH_PASSWORD)
//!      │        failures inside the window ≥ max → too-many-requests
//!      ▼
//! Ok(()) or AuthProviderError (wrong-password, user-not-found, ...)
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use tracing::{debug, error, warn};

use loom_core::auth::AuthProviderError;

use super::AuthError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(())` when `password` is correct for `email`.
    async fn verify(&self, email: &str, password: &str) -> Result<(), AuthProviderError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// The account from configuration, verified in-process.
pub struct LocalIdentityProvider {
    email: String,
    password_hash: Option<String>,
    max_failures: usize,
    window: Duration,
    failures: Mutex<VecDeque<Instant>>,
}

impl LocalIdentityProvider {
    /// An empty `password` leaves the provider unable to verify anyone.
    pub fn new(
        email: &str,
        password: &str,
        max_failures: u32,
        window: Duration,
    ) -> Result<Self, AuthError> {
        let password_hash = if password.is_empty() {
            None
        } else {
            Some(hash_password(password)?)
        };

        Ok(LocalIdentityProvider {
            email: email.trim().to_string(),
            password_hash,
            max_failures: max_failures.max(1) as usize,
            window,
            failures: Mutex::new(VecDeque::new()),
        })
    }

    fn recent_failures(&self, now: Instant) -> usize {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        while let Some(oldest) = failures.front() {
            if now.duration_since(*oldest) > self.window {
                failures.pop_front();
            } else {
                break;
            }
        }
        failures.len()
    }

    fn record_failure(&self, now: Instant) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(now);
    }

    fn clear_failures(&self) {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Argon2 is CPU-bound; keep it off the async worker threads.
async fn verify_off_runtime(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await {
        Ok(valid) => valid,
        Err(e) => {
            error!(error = %e, "Password verification task failed");
            false
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn verify(&self, email: &str, password: &str) -> Result<(), AuthProviderError> {
        let now = Instant::now();
        if self.recent_failures(now) >= self.max_failures {
            warn!("Sign-in locked out after repeated failures");
            return Err(AuthProviderError::TooManyRequests);
        }

        if !email.contains('@') {
            return Err(AuthProviderError::InvalidEmail);
        }

        if !self.email.eq_ignore_ascii_case(email.trim()) {
            self.record_failure(now);
            return Err(AuthProviderError::UserNotFound);
        }

        let Some(hash) = self.password_hash.as_deref() else {
            return Err(AuthProviderError::InvalidCredential);
        };

        if password.is_empty() || !verify_off_runtime(password, hash).await {
            self.record_failure(now);
            debug!(failures = self.recent_failures(now), "Password rejected");
            return Err(AuthProviderError::WrongPassword);
        }

        self.clear_failures();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

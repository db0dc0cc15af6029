//! Sign-in and sign-out for the single authorized account.
//!
//! Every attempt is appended to `loginLogs` and every sign-out to
//! `logoutLogs`. Log writes are best-effort: a store failure is logged and
//! never turns a good sign-in into an error.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use loom_core::auth::{AuthProviderError, AuthorizedAccount};
use loom_core::{AuthEvent, AuthLog, UNKNOWN_IP};
use loom_store::Collection;

use super::jwt::{Claims, JwtManager};
use super::provider::{IdentityProvider, LocalIdentityProvider};
use super::AuthError;
use crate::state::{AuthSettings, StoreState};

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Returned on a successful sign-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: AuthorizedAccount,
}

pub struct AuthService {
    account: AuthorizedAccount,
    provider: Arc<dyn IdentityProvider>,
    jwt: JwtManager,
}

impl AuthService {
    pub fn new(
        account: AuthorizedAccount,
        provider: Arc<dyn IdentityProvider>,
        jwt: JwtManager,
    ) -> Self {
        AuthService {
            account,
            provider,
            jwt,
        }
    }

    /// Local provider with the configured password.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        let provider = LocalIdentityProvider::new(
            &settings.email,
            &settings.password,
            settings.max_failed_attempts,
            Duration::from_secs(settings.lockout_window_secs),
        )?;

        let secret = if settings.jwt_secret.is_empty() {
            warn!("LOOM_JWT_SECRET is not set; sessions will not survive a restart");
            format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
        } else {
            settings.jwt_secret.clone()
        };

        Ok(AuthService::new(
            AuthorizedAccount::new(settings.email.trim(), settings.display_name.clone()),
            Arc::new(provider),
            JwtManager::new(secret, settings.token_lifetime_secs),
        ))
    }

    pub fn account(&self) -> &AuthorizedAccount {
        &self.account
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.jwt.validate_token(token)
    }

    /// Any email other than the configured one is refused before the
    /// identity provider is asked.
    pub async fn sign_in(
        &self,
        store: &StoreState,
        request: &SignInRequest,
        user_agent: &str,
    ) -> Result<Session, AuthError> {
        let email = request.email.trim();

        let verified = if self.account.is_authorized(email) {
            self.provider.verify(email, &request.password).await
        } else {
            Err(AuthProviderError::UnauthorizedEmail)
        };

        if let Err(e) = verified {
            warn!(email = %email, code = %e.code(), provider = self.provider.name(), "Sign-in rejected");
            self.append_log(store, AuthEvent::LoginFailed, email, Some(e.code()), user_agent)
                .await;
            return Err(AuthError::Provider(e));
        }

        let access_token = self.jwt.generate_access_token(&self.account)?;
        self.append_log(store, AuthEvent::LoginSuccess, email, None, user_agent)
            .await;
        info!(email = %email, "Signed in");

        Ok(Session {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.lifetime_secs(),
            account: self.account.clone(),
        })
    }

    /// Tokens are stateless; sign-out only records the event.
    pub async fn sign_out(&self, store: &StoreState, claims: &Claims, user_agent: &str) {
        self.append_log(store, AuthEvent::Logout, &claims.sub, None, user_agent)
            .await;
        info!(email = %claims.sub, "Signed out");
    }

    async fn append_log(
        &self,
        store: &StoreState,
        event: AuthEvent,
        email: &str,
        error_code: Option<String>,
        user_agent: &str,
    ) {
        let Ok(store) = store.get() else {
            warn!(?event, "Store unavailable, auth event not recorded");
            return;
        };

        let logs: Collection<AuthLog> = match event {
            AuthEvent::Logout => store.logout_logs(),
            AuthEvent::LoginSuccess | AuthEvent::LoginFailed => store.login_logs(),
        };

        let entry = AuthLog {
            id: String::new(),
            email: email.to_string(),
            event,
            error_code,
            user_agent: user_agent.to_string(),
            ip_address: UNKNOWN_IP.to_string(),
            timestamp: Utc::now(),
            created_at: None,
        };

        if let Err(e) = logs.create(&entry).await {
            warn!(?event, error = %e, "Failed to record auth event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_store::Store;

    fn settings() -> AuthSettings {
        AuthSettings {
            email: "owner@loom.pk".to_string(),
            password: "s3cret".to_string(),
            display_name: "Owner".to_string(),
            jwt_secret: "test-secret".to_string(),
            ..AuthSettings::default()
        }
    }

    fn request(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_and_logs() {
        let store = Store::memory();
        let state = StoreState::Ready(store.clone());
        let auth = AuthService::from_settings(&settings()).unwrap();

        let session = auth
            .sign_in(&state, &request(" owner@loom.pk ", "s3cret"), "test-agent")
            .await
            .unwrap();
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(auth.validate_token(&session.access_token).unwrap().sub, "owner@loom.pk");

        let logs = store.login_logs().get_all().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event, AuthEvent::LoginSuccess);
        assert_eq!(logs[0].user_agent, "test-agent");
        assert_eq!(logs[0].ip_address, UNKNOWN_IP);
    }

    #[tokio::test]
    async fn test_unauthorized_email_never_reaches_provider() {
        let store = Store::memory();
        let state = StoreState::Ready(store.clone());
        let auth = AuthService::from_settings(&settings()).unwrap();

        let err = auth
            .sign_in(&state, &request("intruder@loom.pk", "s3cret"), "ua")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Provider(AuthProviderError::UnauthorizedEmail)
        ));

        let logs = store.login_logs().get_all().await.unwrap();
        assert_eq!(logs[0].event, AuthEvent::LoginFailed);
        assert_eq!(logs[0].error_code.as_deref(), Some("auth/unauthorized-email"));
    }

    #[tokio::test]
    async fn test_sign_out_is_logged() {
        let store = Store::memory();
        let state = StoreState::Ready(store.clone());
        let auth = AuthService::from_settings(&settings()).unwrap();
        let session = auth
            .sign_in(&state, &request("owner@loom.pk", "s3cret"), "ua")
            .await
            .unwrap();
        let claims = auth.validate_token(&session.access_token).unwrap();

        auth.sign_out(&state, &claims, "ua").await;

        let logs = store.logout_logs().get_all().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event, AuthEvent::Logout);
    }

    #[tokio::test]
    async fn test_sign_in_works_without_store() {
        let state = StoreState::Unavailable {
            reason: "disk full".to_string(),
        };
        let auth = AuthService::from_settings(&settings()).unwrap();
        assert!(auth
            .sign_in(&state, &request("owner@loom.pk", "s3cret"), "ua")
            .await
            .is_ok());
    }
}

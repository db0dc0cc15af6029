//! Single-account authorization and sign-in error mapping.
//!
//! The shop has exactly one authorized account. Any other email is turned
//! away before the identity provider is ever asked.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The one account allowed to sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthorizedAccount {
    pub email: String,
    pub display_name: String,
}

impl AuthorizedAccount {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
        }
    }

    /// Trimmed, case-insensitive comparison.
    pub fn is_authorized(&self, email: &str) -> bool {
        let configured = self.email.trim();
        !configured.is_empty() && configured.eq_ignore_ascii_case(email.trim())
    }
}

/// Failure codes reported by an identity provider.
///
/// Codes arrive as strings such as `auth/wrong-password`; the `auth/`
/// prefix is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuthProviderError {
    InvalidCredential,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    UserDisabled,
    NetworkRequestFailed,
    InvalidEmail,
    /// The email is not the configured account.
    UnauthorizedEmail,
    /// Anything the provider reports that is not listed above.
    Unknown(String),
}

impl AuthProviderError {
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        let bare = code.strip_prefix("auth/").unwrap_or(code);
        match bare {
            "invalid-credential" => Self::InvalidCredential,
            "user-not-found" => Self::UserNotFound,
            "wrong-password" => Self::WrongPassword,
            "too-many-requests" => Self::TooManyRequests,
            "user-disabled" => Self::UserDisabled,
            "network-request-failed" => Self::NetworkRequestFailed,
            "invalid-email" => Self::InvalidEmail,
            "unauthorized-email" => Self::UnauthorizedEmail,
            _ => Self::Unknown(code.to_string()),
        }
    }

    /// Provider-style code, e.g. `auth/wrong-password`. Stored in login logs.
    pub fn code(&self) -> String {
        let bare = match self {
            Self::InvalidCredential => "invalid-credential",
            Self::UserNotFound => "user-not-found",
            Self::WrongPassword => "wrong-password",
            Self::TooManyRequests => "too-many-requests",
            Self::UserDisabled => "user-disabled",
            Self::NetworkRequestFailed => "network-request-failed",
            Self::InvalidEmail => "invalid-email",
            Self::UnauthorizedEmail => "unauthorized-email",
            Self::Unknown(raw) => return raw.clone(),
        };
        format!("auth/{}", bare)
    }

    /// Message shown on the sign-in form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredential | Self::WrongPassword => "Invalid email or password.",
            Self::UserNotFound => "No account found with this email.",
            Self::TooManyRequests => "Too many failed attempts. Please try again later.",
            Self::UserDisabled => "This account has been disabled.",
            Self::NetworkRequestFailed => "Network error. Check your connection and try again.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::UnauthorizedEmail => "This email is not authorized to access the system.",
            Self::Unknown(_) => "Sign-in failed. Please try again.",
        }
    }
}

impl std::fmt::Display for AuthProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::error::Error for AuthProviderError {}

//! Sign-in and sign-out audit documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One entry in `loginLogs` or `logoutLogs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuthLog {
    #[serde(default)]
    pub id: String,

    pub email: String,

    pub event: AuthEvent,

    /// Provider error code for failed attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(default)]
    pub user_agent: String,

    /// Always the placeholder `"unknown"`; the server does not resolve it.
    #[serde(default)]
    pub ip_address: String,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    LoginSuccess,
    LoginFailed,
    Logout,
}

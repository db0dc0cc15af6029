//! # API Error Type
//!
//! Unified error type for every handler.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Loom                                   │
//! │                                                                         │
//! │  Dashboard                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  POST /api/pos/checkout                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::QueryFailed("...") ──┐            │  │
//! │  │         │            (logged, generic message)     │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule broken? ─── CoreError::InsufficientStock ── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "Insufficient stock: Lawn Suit (requested 5, ...)" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use loom_core::auth::AuthProviderError;
use loom_core::{CoreError, ValidationError};
use loom_store::StoreError;

use crate::auth::AuthError;

/// What the dashboard receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "products/7f3c not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Business rule blocked the write (422)
    BusinessLogic,

    /// Cart asks for more than the shelves hold (409)
    InsufficientStock,

    /// Ledger payment rejected (422)
    PaymentError,

    /// Missing or invalid session token (401)
    Unauthorized,

    /// Sign-in rejected by the identity provider (401)
    AuthFailed,

    /// Email is not the configured account (403)
    Forbidden,

    /// Too many failed sign-ins (429)
    TooManyRequests,

    /// Server started without a working store (503)
    StoreUnavailable,

    /// Store operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::BusinessLogic | ErrorCode::PaymentError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::Unauthorized | ErrorCode::AuthFailed => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn store_unavailable() -> Self {
        ApiError::new(
            ErrorCode::StoreUnavailable,
            "The data store is unavailable. Check the server logs.",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Convenience type alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path, id } => ApiError::not_found(&path, &id),
            StoreError::InvalidKey(key) => ApiError::validation(format!("Invalid key: {}", key)),
            StoreError::ConnectionFailed(e) => {
                tracing::error!("Store connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Store connection failed")
            }
            StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Store connection pool exhausted")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Store operation failed: {}", other);
                ApiError::new(ErrorCode::DatabaseError, "Store operation failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::EmptyCart
            | CoreError::PaymentMethodRequired
            | CoreError::StaffRequired
            | CoreError::CartTooLarge { .. }
            | CoreError::Validation(_) => ApiError::validation(message),
            CoreError::InsufficientStock { .. } | CoreError::DisposalExceedsStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::PaymentExceedsBalance { .. }
            | CoreError::InvalidPaymentAmount { .. }
            | CoreError::EntryAlreadyPaid(_) => ApiError::new(ErrorCode::PaymentError, message),
            CoreError::ProductNotFound(_) | CoreError::EmployeeNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, message)
            }
            CoreError::BargainAlreadyDecided { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, message)
            }
        }
    }
}

impl From<AuthProviderError> for ApiError {
    fn from(err: AuthProviderError) -> Self {
        let code = match err {
            AuthProviderError::UnauthorizedEmail => ErrorCode::Forbidden,
            AuthProviderError::TooManyRequests => ErrorCode::TooManyRequests,
            _ => ErrorCode::AuthFailed,
        };
        ApiError::new(code, err.user_message())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Provider(e) => e.into(),
            AuthError::MissingToken | AuthError::InvalidToken(_) => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::Hashing(_) | AuthError::TokenIssue(_) => {
                tracing::error!("Auth failure: {}", err);
                ApiError::internal("Authentication is temporarily unavailable")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

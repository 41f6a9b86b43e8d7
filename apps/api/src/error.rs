//! # HTTP Errors
//!
//! One error type for services and handlers. Core rule violations, store
//! failures and extractor rejections all end up here and leave as
//! `{"code": "...", "message": "..."}` with the matching status.
//!
//! ```text
//!   ValidationError ─┐
//!   CoreError ───────┼──► ApiError { code, message } ──► (StatusCode, Json)
//!   DbError ─────────┤
//!   JsonRejection ───┘
//!
//!   400 VALIDATION_ERROR · INVALID_QUANTITY    409 CONFLICT · INVALID_TRANSITION
//!   401 UNAUTHENTICATED                        422 INSUFFICIENT_STOCK
//!   404 NOT_FOUND                              500 DATABASE_ERROR · INTERNAL
//! ```
//!
//! A failed request writes nothing.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use fabstock_core::{CoreError, ValidationError};
use fabstock_db::DbError;

/// Result alias for services and handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Body of every non-2xx response, e.g.
/// `{"code":"NOT_FOUND","message":"Raw material not found: 6f1c..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    /// Shown as-is in the browser alert.
    pub message: String,
}

/// Wire codes; the HTTP status follows from the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing, malformed or out-of-range input
    ValidationError,

    /// Stock delta is zero, negative or out of range
    InvalidQuantity,

    Unauthenticated,

    NotFound,

    /// Stale write, duplicate key or locked database
    Conflict,

    /// Order status does not allow the transition
    InvalidTransition,

    /// Exit larger than the stock on hand
    InsufficientStock,

    DatabaseError,

    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::InvalidQuantity => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict | ErrorCode::InvalidTransition => StatusCode::CONFLICT,
            ErrorCode::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
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

    /// `"<resource> not found: <id>"`
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "No user is signed in")
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Conflict { entity, id } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} {} was modified concurrently, reload and retry", entity, id),
            ),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists, retry", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::Locked(message) => {
                tracing::warn!(%message, "Database locked");
                ApiError::new(ErrorCode::Conflict, "Another change is being saved, retry")
            }
            DbError::PoolExhausted => {
                tracing::warn!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, retry")
            }
            other => {
                tracing::error!(error = %other, "Database failure");
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Database operation failed: {}", other),
                )
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };

        match err {
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            other => ApiError::new(code, other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies surface as validation errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
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

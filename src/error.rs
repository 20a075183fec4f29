//! Application error type shared by services, repositories and HTTP handlers.
//!
//! Errors carry a human-readable message plus structured `details` which are
//! rendered into the JSON error envelope returned by the API:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": { "code": "abc123" } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::utils::db_error::{SHORT_CODE_CONSTRAINT, is_unique_violation_on_code};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Error taxonomy of the link and analytics core.
#[derive(Debug, Error)]
pub enum AppError {
    /// A caller supplied an argument that can never succeed (bad length, bad URL).
    #[error("{message}")]
    InvalidArgument { message: String, details: Value },

    /// The requested short code does not exist.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A uniqueness constraint rejected the write.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// No unused short code was found within the retry budget.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    CodeExhausted { attempts: usize },

    /// The operating system entropy source could not be read.
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    /// Registry read or write failure.
    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::CodeExhausted { .. } => "code_exhausted",
            AppError::RandomSource(_) => "internal_error",
            AppError::Storage { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::CodeExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RandomSource(_) | AppError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into its public representation.
    ///
    /// Storage and entropy failures are reported generically; their cause is
    /// logged instead of being sent to the client.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::InvalidArgument { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details } => (message.clone(), details.clone()),
            AppError::CodeExhausted { attempts } => (
                self.to_string(),
                json!({ "attempts": attempts }),
            ),
            AppError::RandomSource(_) | AppError::Storage { .. } => {
                ("Internal server error".to_string(), json!({}))
            }
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_code(&e) {
            return AppError::conflict(
                "Short code already exists",
                json!({ "constraint": SHORT_CODE_CONSTRAINT }),
            );
        }

        if let sqlx::Error::RowNotFound = e {
            return AppError::not_found("Record not found", json!({}));
        }

        AppError::storage(format!("Database error: {e}"), json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();

        AppError::invalid_argument(
            "Request validation failed",
            json!({ "fields": fields, "reason": e.to_string() }),
        )
    }
}

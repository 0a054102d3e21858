use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure reported by an upstream collaborator (the database or the identity service).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The service could not be reached. Safe to retry.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// The call reached the service but was refused. Displays the upstream message as-is.
    #[error("{detail}")]
    Rejected {
        code: Option<String>,
        detail: String,
    },

    /// Only meaningful for single-item lookups and deletes; list queries return empty instead.
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unreachable(_))
    }

    pub fn rejected(detail: impl Into<String>) -> Self {
        StoreError::Rejected {
            code: None,
            detail: detail.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unreachable(e.to_string()),
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) => StoreError::Rejected {
                code: db.code().map(|c| c.into_owned()),
                detail: db.message().to_string(),
            },
            _ => StoreError::rejected(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            return StoreError::Unreachable(e.to_string());
        }
        match e.status() {
            Some(status) if status.is_server_error() => StoreError::Unreachable(e.to_string()),
            Some(status) => StoreError::Rejected {
                code: Some(status.as_u16().to_string()),
                detail: e.to_string(),
            },
            None => StoreError::rejected(e.to_string()),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut upstream_code = None;
        let (status, code, message, retryable) = match &self {
            AppError::Store(e @ StoreError::Unreachable(_)) => {
                tracing::error!("Upstream unreachable: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_UNREACHABLE",
                    e.to_string(),
                    true,
                )
            }
            AppError::Store(StoreError::Rejected { code, detail }) => {
                tracing::error!("Upstream rejected ({code:?}): {detail}");
                upstream_code = code.clone();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_REJECTED",
                    detail.clone(),
                    false,
                )
            }
            // A missing item that escapes to a handler is still an upstream failure.
            AppError::Store(e @ StoreError::NotFound(_)) => {
                tracing::error!("Upstream lookup failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_NOT_FOUND",
                    e.to_string(),
                    false,
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                false,
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                false,
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), false),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    false,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
            "retryable": retryable,
        });
        if let Some(upstream_code) = upstream_code {
            body["upstream_code"] = json!(upstream_code);
        }

        (status, Json(body)).into_response()
    }
}

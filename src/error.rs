use std::future::Future;
use std::time::Duration;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::api::response::ErrorResponse;

/// Message used for every ownership denial, whatever the underlying reason
pub const ACCESS_DENIED: &str = "you are not allowed to access this record";

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input, missing required field, malformed identifier
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or incomplete credential
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Authenticated but not permitted
    #[error("{0}")]
    Forbidden(&'static str),

    /// No record matched under the operation's state filter
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Record exists but is in the wrong lifecycle state (or would duplicate one)
    #[error("{0}")]
    Conflict(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request-scoped deadline elapsed
    #[error("operation timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Timeout | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                "internal server error".to_string()
            }
            AppError::Timeout => {
                error!("Request timed out");
                self.to_string()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                "internal server error".to_string()
            }
            other => {
                warn!("Request rejected ({}): {}", status.as_u16(), other);
                other.to_string()
            }
        };

        HttpResponse::build(status).json(ErrorResponse::new(message))
    }
}

/// Bound a request-scoped operation; no retries, the caller sees the failure
pub async fn within<T, F>(limit: Duration, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AppError::Timeout)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden(ACCESS_DENIED).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("pekerjaan").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Timeout.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn database_errors_do_not_leak_details() {
        let resp = AppError::Database(sqlx::Error::PoolTimedOut).error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "internal server error");
    }

    #[actix_web::test]
    async fn within_reports_timeout() {
        let result: AppResult<()> = within(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout)));
    }
}

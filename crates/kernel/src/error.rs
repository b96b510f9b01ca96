//! Error types.
//!
//! [`ReportError`] is the report engine's taxonomy. Only
//! `DataSourceUnavailable` ever reaches a response; the other variants are
//! recovered where they occur (parameters fall back to defaults, missing
//! products become placeholder rows, a broken category tree degrades to a
//! flat list).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the report engine and its collaborators.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid value for '{field}': {value:?}")]
    InvalidParameter { field: &'static str, value: String },

    #[error("data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("malformed category hierarchy: {0}")]
    MalformedHierarchy(String),

    #[error("product {0} not found")]
    ProductNotFound(i64),
}

impl From<sqlx::Error> for ReportError {
    fn from(e: sqlx::Error) -> Self {
        ReportError::DataSourceUnavailable(e.to_string())
    }
}

/// Result type alias using ReportError.
pub type ReportResult<T> = Result<T, ReportError>;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Report(ReportError::DataSourceUnavailable(detail)) => {
                tracing::error!(error = %detail, "report data source unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The stock-out report is temporarily unavailable.".to_string(),
                )
            }
            AppError::Report(e) => {
                tracing::error!(error = %e, "unrecovered report error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

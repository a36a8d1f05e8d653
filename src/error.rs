use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidDate(String),

    /// A new subscription would end on or before the latest one already recorded
    /// for the same user and service.
    #[error("You already have an active {service_name} plan until {}.", .until.format("%Y-%m-%d"))]
    OverlappingPeriod {
        service_name: String,
        until: NaiveDate,
    },

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Notification dispatch failed: {0}")]
    Dispatch(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_)
            | AppError::InvalidDate(_)
            | AppError::OverlappingPeriod { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ExternalApi(_) | AppError::HttpClient(_) | AppError::Dispatch(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            AppError::NotFound(msg) | AppError::ExternalApi(msg) => msg.clone(),
            AppError::HttpClient(_) => "Upstream request failed".to_string(),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %self, "Request failed with internal error");
                "Server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::AppError;

/// `Json` whose rejections come back as `{"error": ...}` bodies
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

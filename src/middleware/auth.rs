use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::AppError, routes::AppState};

/// The authenticated caller, resolved from an `Authorization: Bearer` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
            AppError::Unauthenticated("No authorization header provided".to_string())
        })?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.split_once(' '))
            .filter(|(scheme, token)| *scheme == "Bearer" && !token.trim().is_empty())
            .map(|(_, token)| token.trim())
            .ok_or_else(|| AppError::Unauthenticated("Invalid authorization format".to_string()))?;

        let user_id = state.verifier.verify(token)?;
        Ok(AuthUser(user_id))
    }
}

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    routes::{AppJson, AppState},
};

#[derive(Debug, Deserialize)]
pub struct MovieSearchRequest {
    #[serde(default)]
    title: Option<String>,
}

/// POST /api/movies/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
    AppJson(request): AppJson<MovieSearchRequest>,
) -> AppResult<Json<Value>> {
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Title required".to_string()))?;

    let searcher = state
        .movies
        .as_ref()
        .ok_or_else(|| AppError::ExternalApi("Movie search is not configured".to_string()))?;

    let results = searcher.search(title).await?;
    Ok(Json(json!({ "results": results })))
}

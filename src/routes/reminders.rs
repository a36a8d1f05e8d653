use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::AuthUser, models::Reminder, routes::AppState,
    services::reminders,
};

/// GET /api/reminders
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Reminder>>> {
    let reminders =
        reminders::get_reminders(state.subscriptions.as_ref(), user_id, state.now()).await?;
    Ok(Json(reminders))
}

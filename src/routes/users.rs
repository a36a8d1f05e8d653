use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::ReminderPreference,
    routes::{AppJson, AppState},
};

/// GET /api/users/reminder
pub async fn get_reminder_preference(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ReminderPreference>> {
    Ok(Json(state.users.reminder_preference(user_id).await?))
}

/// PUT /api/users/reminder
pub async fn set_reminder_preference(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    AppJson(request): AppJson<ReminderPreference>,
) -> AppResult<Json<ReminderPreference>> {
    let pref = state
        .users
        .set_reminder_preference(user_id, request.reminders_enabled)
        .await?;

    tracing::info!(user_id = %user_id, reminders_enabled = pref.reminders_enabled, "Reminder preference updated");
    Ok(Json(pref))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthUser, RequestId},
    models::{CreateSubscriptionRequest, Subscription},
    routes::{AppJson, AppState},
    services::subscriptions,
};

/// POST /api/subscriptions
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user_id): AuthUser,
    AppJson(request): AppJson<CreateSubscriptionRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    tracing::info!(request_id = %request_id, user_id = %user_id, "Creating subscription");

    let subscription =
        subscriptions::create_subscription(state.subscriptions.as_ref(), user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Subscription saved",
            "subscription": subscription,
        })),
    ))
}

/// GET /api/subscriptions
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Subscription>>> {
    let subs = subscriptions::list_subscriptions(state.subscriptions.as_ref(), user_id).await?;
    Ok(Json(subs))
}

/// DELETE /api/subscriptions/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let subscription_id =
        Uuid::parse_str(&id).map_err(|_| AppError::NotFound("Not found".to_string()))?;

    subscriptions::delete_subscription(state.subscriptions.as_ref(), user_id, subscription_id)
        .await?;

    Ok(Json(json!({ "message": "Deleted" })))
}

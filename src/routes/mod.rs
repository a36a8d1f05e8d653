use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod extract;
pub mod movies;
pub mod reminders;
pub mod state;
pub mod subscriptions;
pub mod users;

pub use extract::AppJson;
pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            // Request ids must be assigned before the trace span is built
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api; every handler requires an authenticated user
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/subscriptions",
            post(subscriptions::create).get(subscriptions::list),
        )
        .route("/subscriptions/:id", delete(subscriptions::remove))
        .route("/reminders", get(reminders::list))
        .route(
            "/users/reminder",
            get(users::get_reminder_preference).put(users::set_reminder_preference),
        )
        .route("/movies/search", post(movies::search))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

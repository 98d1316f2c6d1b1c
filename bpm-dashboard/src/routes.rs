pub use crate::data_files::{data_all_handler, data_users_handler};
pub use crate::pipeline_health::pipeline_health_handler;
pub use crate::search_users::search_users_handler;

use crate::error::ServiceError;
use crate::state::AppState;
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const ENDPOINTS: [&str; 4] = ["/data-all", "/data-users", "/search-users", "/pipeline-health"];

pub async fn index_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "endpoints": ENDPOINTS }))
}

async fn fallback_handler() -> ServiceError {
    ServiceError::NotFound
}

/// All service routes, open to any origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/data-all", get(data_all_handler))
        .route("/data-users", get(data_users_handler))
        .route("/search-users", get(search_users_handler))
        .route("/pipeline-health", get(pipeline_health_handler))
        .fallback(fallback_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

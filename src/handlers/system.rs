use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::database::CatalogStore;
use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Snack Catalog API",
            "version": version,
            "endpoints": {
                "categories": "GET /categories, GET /api/v1/categories/:id",
                "items": "GET /items?page=N, GET /items/:id, POST /items, PATCH /items/:id, DELETE /items/:id",
                "comments": "GET /comments?page=N, POST /user/comments, GET /temp/comments, DELETE /temp/comments/:id",
                "admin": "POST /admin/comments/:id, DELETE /admin/comments/:id",
                "users": "POST /user/create",
                "session": "GET /login, GET /login-results, GET /logout",
            }
        }
    }))
}

/// GET /health - liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    store_status(state.store.as_ref()).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}

async fn store_status(store: &dyn CatalogStore) -> Result<(), ApiError> {
    store.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable(e.to_string())
    })
}

/// Router fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("no route")
}

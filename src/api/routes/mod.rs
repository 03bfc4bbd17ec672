//! API routes module - organizes all route handlers.
//!
//! Item routes live under /api/menu/items; the health check and the OpenAPI
//! document sit beside them.

pub mod app_state;
pub mod auth_context;
pub mod error;
pub mod items;
pub mod openapi;

use axum::{Router, http::Uri, response::Json, routing::get};
use serde_json::{Value, json};

pub use app_state::AppState;
use error::ApiError;

/// Path the item routes are mounted under.
pub const ITEMS_BASE_PATH: &str = "/api/menu/items";

/// Create the main API router combining all route modules.
///
/// The state is attached here, so the result can be served (or wrapped by
/// `middleware::with_http_layers`) directly.
pub fn create_api_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(items::items_router(&app_state, ITEMS_BASE_PATH))
        // OpenAPI documentation endpoints
        .merge(openapi::openapi_router())
        .fallback(not_found)
        .with_state(app_state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!("No route for {}", uri.path());
    ApiError::not_found("resource not found")
}

//! Item routes: list, get, create, upsert and delete.
//!
//! Reads are public. Each mutating handler is wrapped in its own pipeline:
//! authentication, then the permission check for its operation tag.

use axum::{
    Json, Router,
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
};
use thiserror::Error;
use tower::ServiceBuilder;
use tracing::{debug, error, info};

use super::app_state::AppState;
use super::auth_context::AuthContext;
use super::error::ApiError;
use crate::middleware::{PermissionGuard, authenticate, require_permission};
use crate::models::{BaseItem, Item, ItemPermission, ItemValidationError};
use crate::storage::StorageError;

/// Body returned by `GET /{id}` when no item has that identifier.
pub const ITEM_NOT_FOUND: &str = "item not found";

/// Failures a handler turns into a response.
#[derive(Debug, Error)]
pub enum ItemRouteError {
    #[error(transparent)]
    Invalid(#[from] ItemValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ItemRouteError {
    fn into_response(self) -> Response {
        match self {
            ItemRouteError::Invalid(e) => ApiError::bad_request(e.to_string()).into_response(),
            // The store's message is passed through verbatim
            ItemRouteError::Storage(e) => {
                error!("Item store failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

/// Create the items router, mounted at `base`.
///
/// The collection route answers both `base` and `base/`. The returned router
/// still needs [`AppState`]; callers merge it and attach the state (see
/// `create_api_router`).
pub fn items_router(state: &AppState, base: &str) -> Router<AppState> {
    let guarded = |permission: ItemPermission| {
        ServiceBuilder::new()
            .layer(from_fn_with_state(state.tokens.clone(), authenticate))
            .layer(from_fn_with_state(
                PermissionGuard::new(state.policy.clone(), permission),
                require_permission,
            ))
    };

    let collection =
        get(list_items).post(create_item.layer(guarded(ItemPermission::CreateItems)));

    // In axum 0.8, path parameters use curly braces {} instead of colons :
    Router::new()
        .route(base, collection.clone())
        .route(&format!("{}/", base), collection)
        .route(
            &format!("{}/{{id}}", base),
            get(get_item)
                .put(update_item.layer(guarded(ItemPermission::UpdateItems)))
                .delete(delete_item.layer(guarded(ItemPermission::DeleteItems))),
        )
}

/// GET / - List all items
#[utoipa::path(
    get,
    path = "/api/menu/items",
    tag = "Items",
    responses(
        (status = 200, description = "All stored items", body = [Item]),
        (status = 500, description = "Item store failure", body = String)
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ItemRouteError> {
    let items = state.store.find_all().await?;
    debug!("Listing {} items", items.len());
    Ok(Json(items))
}

/// GET /{id} - Get a single item by ID
#[utoipa::path(
    get,
    path = "/api/menu/items/{id}",
    tag = "Items",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "No item with this identifier", body = String),
        (status = 500, description = "Item store failure", body = String)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ItemRouteError> {
    match state.store.find(&id).await? {
        Some(item) => Ok(Json(item).into_response()),
        None => Ok((StatusCode::NOT_FOUND, ITEM_NOT_FOUND).into_response()),
    }
}

/// POST / - Create a new item with a generated identifier
#[utoipa::path(
    post,
    path = "/api/menu/items",
    tag = "Items",
    request_body = BaseItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid item payload"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token lacks create:items"),
        (status = 500, description = "Item store failure", body = String)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(item): Json<BaseItem>,
) -> Result<(StatusCode, Json<Item>), ItemRouteError> {
    item.validate()?;

    let created = state.store.create(item, None).await?;
    info!("{} created item {}", auth.subject(), created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /{id} - Update an item, creating it under `id` when absent
#[utoipa::path(
    put,
    path = "/api/menu/items/{id}",
    tag = "Items",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = BaseItem,
    responses(
        (status = 200, description = "Existing item updated", body = Item),
        (status = 201, description = "Item created under the given identifier", body = Item),
        (status = 400, description = "Invalid item payload"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token lacks update:items"),
        (status = 500, description = "Item store failure", body = String)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    Json(item): Json<BaseItem>,
) -> Result<(StatusCode, Json<Item>), ItemRouteError> {
    item.validate()?;

    let (stored, created) = state.store.upsert(&id, item).await?;
    if created {
        info!("{} created item {} via upsert", auth.subject(), stored.id);
        Ok((StatusCode::CREATED, Json(stored)))
    } else {
        info!("{} updated item {}", auth.subject(), stored.id);
        Ok((StatusCode::OK, Json(stored)))
    }
}

/// DELETE /{id} - Delete an item
#[utoipa::path(
    delete,
    path = "/api/menu/items/{id}",
    tag = "Items",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Item deleted, or was already absent"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token lacks delete:items"),
        (status = 500, description = "Item store failure", body = String)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ItemRouteError> {
    state.store.remove(&id).await?;
    info!("{} deleted item {}", auth.subject(), id);
    Ok(StatusCode::NO_CONTENT)
}

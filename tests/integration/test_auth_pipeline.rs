//! Authentication and permission pipeline tests.
//!
//! The store used here counts every call so the tests can assert that a
//! rejected request never reached the data layer.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use items_api::models::{BaseItem, Item};
use items_api::routes::{AppState, create_api_router};
use items_api::services::{ClaimPermissionPolicy, JwtService};
use items_api::storage::{ItemStore, MemoryItemStore, StorageError};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const SECRET: &str = "test-secret-key-at-least-32-chars";

#[derive(Default)]
struct CountingStore {
    inner: MemoryItemStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ItemStore for CountingStore {
    async fn find_all(&self) -> Result<Vec<Item>, StorageError> {
        self.touch();
        self.inner.find_all().await
    }

    async fn find(&self, id: &str) -> Result<Option<Item>, StorageError> {
        self.touch();
        self.inner.find(id).await
    }

    async fn create(&self, item: BaseItem, id: Option<String>) -> Result<Item, StorageError> {
        self.touch();
        self.inner.create(item, id).await
    }

    async fn update(&self, id: &str, item: BaseItem) -> Result<Item, StorageError> {
        self.touch();
        self.inner.update(id, item).await
    }

    async fn upsert(&self, id: &str, item: BaseItem) -> Result<(Item, bool), StorageError> {
        self.touch();
        self.inner.upsert(id, item).await
    }

    async fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.touch();
        self.inner.remove(id).await
    }
}

/// A data layer that is down.
struct FailingStore;

#[async_trait]
impl ItemStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<Item>, StorageError> {
        Err(StorageError::ConnectionError("database unreachable".to_string()))
    }

    async fn find(&self, _id: &str) -> Result<Option<Item>, StorageError> {
        Err(StorageError::ConnectionError("database unreachable".to_string()))
    }

    async fn create(&self, _item: BaseItem, _id: Option<String>) -> Result<Item, StorageError> {
        Err(StorageError::Other("insert failed".to_string()))
    }

    async fn update(&self, _id: &str, _item: BaseItem) -> Result<Item, StorageError> {
        Err(StorageError::Other("update failed".to_string()))
    }

    async fn upsert(&self, _id: &str, _item: BaseItem) -> Result<(Item, bool), StorageError> {
        Err(StorageError::Other("upsert failed".to_string()))
    }

    async fn remove(&self, _id: &str) -> Result<(), StorageError> {
        Err(StorageError::Other("delete failed".to_string()))
    }
}

fn server_with_store(store: Arc<dyn ItemStore>) -> (TestServer, JwtService) {
    let jwt = JwtService::new(SECRET);
    let state = AppState::new(
        store,
        Arc::new(jwt.clone()),
        Arc::new(ClaimPermissionPolicy),
    );
    (TestServer::new(create_api_router(state)).unwrap(), jwt)
}

fn tea() -> Value {
    json!({
        "name": "Tea",
        "price": 199,
        "description": "Informative",
        "image": ""
    })
}

#[tokio::test]
async fn test_unauthenticated_mutations_rejected_before_handler() {
    let store = Arc::new(CountingStore::default());
    let (server, _) = server_with_store(store.clone());

    let post = server.post("/api/menu/items").json(&tea()).await;
    let put = server.put("/api/menu/items/tea").json(&tea()).await;
    let delete = server.delete("/api/menu/items/tea").await;

    for response in [post, put, delete] {
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"], "missing bearer token");
        assert_eq!(body["status"], 401);
    }
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_reads_do_not_require_a_token() {
    let store = Arc::new(CountingStore::default());
    let (server, _) = server_with_store(store.clone());

    assert_eq!(
        server.get("/api/menu/items").await.status_code(),
        StatusCode::OK
    );
    assert_eq!(
        server.get("/api/menu/items/tea").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let store = Arc::new(CountingStore::default());
    let (server, _) = server_with_store(store.clone());

    let response = server
        .post("/api/menu/items")
        .authorization_bearer("not-a-jwt")
        .json(&tea())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let store = Arc::new(CountingStore::default());
    let (server, jwt) = server_with_store(store.clone());
    let token = jwt
        .issue_access_token_with_ttl("chef@example.com", ["create:items"], Duration::minutes(-10))
        .unwrap();

    let response = server
        .post("/api/menu/items")
        .authorization_bearer(&token)
        .json(&tea())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "token has expired");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let store = Arc::new(CountingStore::default());
    let (server, _) = server_with_store(store.clone());
    let token = JwtService::new("a-completely-different-secret-value!!")
        .issue_access_token("mallory@example.com", ["delete:items"])
        .unwrap();

    let response = server
        .delete("/api/menu/items/tea")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_missing_permission_rejected_before_data_layer() {
    let store = Arc::new(CountingStore::default());
    let (server, jwt) = server_with_store(store.clone());
    let reader = jwt
        .issue_access_token("reader@example.com", Vec::<String>::new())
        .unwrap();

    let post = server
        .post("/api/menu/items")
        .authorization_bearer(&reader)
        .json(&tea())
        .await;
    assert_eq!(post.status_code(), StatusCode::FORBIDDEN);
    let body: Value = post.json();
    assert_eq!(
        body["error"],
        "insufficient permissions: missing 'create:items'"
    );

    let put = server
        .put("/api/menu/items/tea")
        .authorization_bearer(&reader)
        .json(&tea())
        .await;
    assert_eq!(put.status_code(), StatusCode::FORBIDDEN);

    let delete = server
        .delete("/api/menu/items/tea")
        .authorization_bearer(&reader)
        .await;
    assert_eq!(delete.status_code(), StatusCode::FORBIDDEN);

    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_each_route_checks_its_own_permission() {
    let store = Arc::new(CountingStore::default());
    let (server, jwt) = server_with_store(store.clone());
    let creator = jwt
        .issue_access_token("chef@example.com", ["create:items"])
        .unwrap();

    let created = server
        .post("/api/menu/items")
        .authorization_bearer(&creator)
        .json(&tea())
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let put = server
        .put("/api/menu/items/tea")
        .authorization_bearer(&creator)
        .json(&tea())
        .await;
    assert_eq!(put.status_code(), StatusCode::FORBIDDEN);

    let delete = server
        .delete("/api/menu/items/tea")
        .authorization_bearer(&creator)
        .await;
    assert_eq!(delete.status_code(), StatusCode::FORBIDDEN);

    // Only the create reached the store
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_scope_claim_grants_permission() {
    let (server, _) = server_with_store(Arc::new(MemoryItemStore::new()));
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": "chef@example.com",
        "iat": now,
        "exp": now + 600,
        "scope": "openid delete:items"
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let response = server
        .delete("/api/menu/items/tea")
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_data_layer_failure_exposes_message() {
    let (server, jwt) = server_with_store(Arc::new(FailingStore));
    let token = jwt
        .issue_access_token(
            "chef@example.com",
            ["create:items", "update:items", "delete:items"],
        )
        .unwrap();

    let list = server.get("/api/menu/items").await;
    assert_eq!(list.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(list.text(), "Connection error: database unreachable");

    let get = server.get("/api/menu/items/tea").await;
    assert_eq!(get.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let post = server
        .post("/api/menu/items")
        .authorization_bearer(&token)
        .json(&tea())
        .await;
    assert_eq!(post.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(post.text(), "Storage error: insert failed");

    let put = server
        .put("/api/menu/items/tea")
        .authorization_bearer(&token)
        .json(&tea())
        .await;
    assert_eq!(put.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(put.text(), "Storage error: upsert failed");

    let delete = server
        .delete("/api/menu/items/tea")
        .authorization_bearer(&token)
        .await;
    assert_eq!(delete.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(delete.text(), "Storage error: delete failed");
}

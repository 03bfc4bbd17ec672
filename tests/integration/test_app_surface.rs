//! Application surface tests: health, OpenAPI document, fallback and the
//! HTTP layers wrapped around the router.

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use items_api::config::ServerConfig;
use items_api::middleware::with_http_layers;
use items_api::routes::{AppState, create_api_router};
use items_api::services::JwtService;
use serde_json::Value;

const SECRET: &str = "test-secret-key-at-least-32-chars";

fn config(vars: &[(&str, &str)]) -> ServerConfig {
    ServerConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .or_else(|| (key == "JWT_SECRET").then(|| SECRET.to_string()))
    })
    .unwrap()
}

fn layered_server(vars: &[(&str, &str)]) -> TestServer {
    let config = config(vars);
    let router = create_api_router(AppState::in_memory(JwtService::new(SECRET)));
    TestServer::new(with_http_layers(router, &config)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new(create_api_router(AppState::in_memory(JwtService::new(
        SECRET,
    ))))
    .unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "items-api");
}

#[tokio::test]
async fn test_openapi_document_lists_item_paths() {
    let server = layered_server(&[]);

    let response = server.get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"]["/api/menu/items"].is_object());
    assert!(body["paths"]["/api/menu/items/{id}"]["put"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let server = layered_server(&[]);

    let response = server.get("/api/menu/nothing/here").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "resource not found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let server = layered_server(&[("CORS_ORIGINS", "https://menu.example.com")]);

    let response = server
        .get("/api/menu/items")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://menu.example.com"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("access-control-allow-origin"),
        "https://menu.example.com"
    );
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let server = layered_server(&[("RATE_LIMIT_PER_MINUTE", "1")]);

    let first = server.get("/health").await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = server.get("/health").await;
    assert_eq!(second.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = second.json();
    assert_eq!(body["error"], "rate limit exceeded");
}

#[test]
fn test_config_rejects_missing_secret_outside_development() {
    let result = ServerConfig::from_lookup(|_| None);
    assert!(result.is_err());

    let dev = ServerConfig::from_lookup(|key| (key == "APP_ENV").then(|| "development".to_string()))
        .unwrap();
    assert!(dev.development);
    assert_eq!(dev.port, 8081);
}

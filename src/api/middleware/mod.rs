//! Middleware module - the request pipeline stages and the HTTP layers
//! applied around the whole application.
//!
//! Protected item routes run an ordered pipeline in front of their handler:
//! [`auth::authenticate`] then [`permissions::require_permission`]. Each stage
//! answers the request itself on failure, so later stages never see it.

pub mod auth;
pub mod cors;
pub mod observability;
pub mod permissions;
pub mod rate_limit;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use auth::authenticate;
pub use cors::create_cors_layer;
pub use permissions::{PermissionGuard, require_permission};

/// Wrap the application router in the configured HTTP layers.
pub fn with_http_layers(mut router: Router, config: &ServerConfig) -> Router {
    if let Some(quota) = config.rate_limit_per_minute {
        let limiter = rate_limit::create_rate_limiter_with_quota(quota);
        router = router.layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit::rate_limit_middleware,
        ));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&config.cors_origins)),
    )
}

//! Permission stage.
//!
//! Runs after [`authenticate`](super::auth::authenticate) and checks the
//! principal against the operation tag the route was registered with.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::models::{ItemPermission, Principal};
use crate::routes::error::ApiError;
use crate::services::SharedPermissionPolicy;

/// State for one permission stage: the policy plus the tag it enforces.
#[derive(Clone)]
pub struct PermissionGuard {
    policy: SharedPermissionPolicy,
    required: ItemPermission,
}

impl PermissionGuard {
    pub fn new(policy: SharedPermissionPolicy, required: ItemPermission) -> Self {
        Self { policy, required }
    }
}

pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(principal) = request.extensions().get::<Principal>() else {
        // authenticate did not run ahead of this stage
        warn!("Permission check on {} without a principal", request.uri().path());
        return Err(ApiError::unauthorized("authentication required"));
    };

    guard
        .policy
        .check(principal, guard.required)
        .map_err(|e| {
            warn!(
                "Denied {} for {} (granted: {:?})",
                guard.required,
                principal.subject,
                principal.permissions()
            );
            ApiError::forbidden(e.to_string())
        })?;

    debug!("Granted {} to {}", guard.required, principal.subject);
    Ok(next.run(request).await)
}

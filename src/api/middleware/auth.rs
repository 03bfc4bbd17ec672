//! Authentication stage.
//!
//! Validates the bearer token and places the caller's [`Principal`] in the
//! request extensions. Requests without a valid token never reach the
//! permission stage or the handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use tracing::{debug, warn};

use crate::models::Principal;
use crate::routes::error::ApiError;
use crate::services::{AuthError, SharedTokenValidator};

pub async fn authenticate(
    State(validator): State<SharedTokenValidator>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        warn!(
            "No bearer token on {} {}",
            request.method(),
            request.uri().path()
        );
        return Err(ApiError::unauthorized(
            AuthError::MissingCredentials.to_string(),
        ));
    };

    let claims = validator.validate(bearer.token()).map_err(|e| {
        warn!(
            "Rejected bearer token on {} {}: {}",
            request.method(),
            request.uri().path(),
            e
        );
        ApiError::unauthorized(e.to_string())
    })?;

    let principal = Principal::from(claims);
    debug!("Authenticated {}", principal.subject);
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

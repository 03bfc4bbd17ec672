//! Authentication context utilities.
//!
//! Provides the extractor handlers use to read the caller placed in the
//! request extensions by the authentication stage.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::Principal;

/// Authentication context extracted from request
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub principal: Principal,
}

impl AuthContext {
    pub fn subject(&self) -> &str {
        &self.principal.subject
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
            tracing::warn!("Request reached an authenticated handler without a principal");
            ApiError::unauthorized("authentication required")
        })?;

        Ok(AuthContext { principal })
    }
}

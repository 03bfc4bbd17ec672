//! JWT Service for token issuance and validation.
//!
//! Access tokens are HS256-signed and carry the caller's granted permissions,
//! either as a `permissions` array or a space-delimited `scope` string.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::Principal;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (caller identity)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Audience; a string or an array of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Granted permissions (e.g. "create:items")
    #[serde(default)]
    pub permissions: Vec<String>,
    /// OAuth scope string; its entries count as permissions too
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        let scoped = claims
            .scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string);
        Principal::new(claims.sub, claims.permissions.into_iter().chain(scoped))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingCredentials,
    #[error("token has expired")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("invalid token audience")]
    InvalidAudience,
    #[error("invalid token issuer")]
    InvalidIssuer,
    #[error("token has an empty subject")]
    EmptySubject,
    #[error("invalid token: {0}")]
    Malformed(String),
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Validates bearer tokens presented to the mutating item routes.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str) -> Result<Claims, AuthError>;
}

/// JWT Service configuration
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    audience: Option<String>,
    issuer: Option<String>,
    access_token_duration: Duration,
}

impl JwtService {
    /// Create a new JWT service with the given secret
    ///
    /// # Arguments
    /// * `secret` - The secret key for signing tokens (should be at least 32 bytes)
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            audience: None,
            issuer: None,
            access_token_duration: Duration::minutes(15),
        }
    }

    /// Require (and stamp on issued tokens) the given audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Require (and stamp on issued tokens) the given issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Issue an access token granting `permissions` to `subject`.
    pub fn issue_access_token<I, P>(&self, subject: &str, permissions: I) -> Result<String, AuthError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.issue_access_token_with_ttl(subject, permissions, self.access_token_duration)
    }

    /// Issue an access token with an explicit lifetime (negative values yield expired tokens).
    pub fn issue_access_token_with_ttl<I, P>(
        &self,
        subject: &str,
        permissions: I,
        ttl: Duration,
    ) -> Result<String, AuthError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            aud: self.audience.clone().map(serde_json::Value::String),
            iss: self.issuer.clone(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            scope: None,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Validate an access token and return the claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::Malformed(e.to_string()),
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(AuthError::EmptySubject);
        }

        debug!("Validated access token for {}", token_data.claims.sub);
        Ok(token_data.claims)
    }
}

impl TokenValidator for JwtService {
    fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_access_token(token)
    }
}

/// Shared token validator for use across the application
pub type SharedTokenValidator = Arc<dyn TokenValidator>;

//! Permission policy for the mutating item routes.
//!
//! The policy is a pure check: no IO and no knowledge of HTTP.

use std::sync::Arc;

use thiserror::Error;

use crate::models::{ItemPermission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("insufficient permissions: missing '{0}'")]
    Forbidden(ItemPermission),
}

/// Decides whether a principal may perform a tagged operation.
pub trait PermissionPolicy: Send + Sync {
    fn check(&self, principal: &Principal, required: ItemPermission) -> Result<(), AuthzError>;
}

/// Grants an operation iff the principal's token carries its permission string.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimPermissionPolicy;

impl PermissionPolicy for ClaimPermissionPolicy {
    fn check(&self, principal: &Principal, required: ItemPermission) -> Result<(), AuthzError> {
        if principal.has_permission(required.as_str()) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden(required))
        }
    }
}

pub type SharedPermissionPolicy = Arc<dyn PermissionPolicy>;

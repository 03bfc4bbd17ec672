//! Services module - token validation and permission policy.

pub mod jwt_service;
pub mod permission_service;

// Re-export for convenience
pub use jwt_service::{AuthError, Claims, JwtService, SharedTokenValidator, TokenValidator};
pub use permission_service::{
    AuthzError, ClaimPermissionPolicy, PermissionPolicy, SharedPermissionPolicy,
};

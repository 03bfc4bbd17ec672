//! Application state management.
//!
//! Defines the AppState struct that holds the collaborators every route
//! handler and pipeline stage works against: the item store, the token
//! validator and the permission policy.

use crate::config::ServerConfig;
use crate::services::{
    ClaimPermissionPolicy, SharedPermissionPolicy, SharedTokenValidator, TokenValidator,
};
use crate::storage::{ItemStore, MemoryItemStore, PostgresItemStore, StorageError};
use std::sync::Arc;
use tracing::info;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data layer for items
    pub store: Arc<dyn ItemStore>,
    /// Bearer token validation for the mutating routes
    pub tokens: SharedTokenValidator,
    /// Permission decisions for the mutating routes
    pub policy: SharedPermissionPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ItemStore>,
        tokens: SharedTokenValidator,
        policy: SharedPermissionPolicy,
    ) -> Self {
        Self {
            store,
            tokens,
            policy,
        }
    }

    /// State backed by an empty in-memory store and the claim-based policy.
    pub fn in_memory<V>(tokens: V) -> Self
    where
        V: TokenValidator + 'static,
    {
        Self::new(
            Arc::new(MemoryItemStore::new()),
            Arc::new(tokens),
            Arc::new(ClaimPermissionPolicy),
        )
    }

    /// Build the state described by the configuration.
    ///
    /// Connects to PostgreSQL if DATABASE_URL is set, otherwise falls back
    /// to the in-memory store (optionally seeded).
    pub async fn from_config(config: &ServerConfig) -> Result<Self, StorageError> {
        let store: Arc<dyn ItemStore> = match &config.database_url {
            Some(database_url) => Arc::new(PostgresItemStore::connect(database_url).await?),
            None if config.seed_items => {
                info!("Using in-memory item store seeded with the sample menu");
                Arc::new(MemoryItemStore::seeded())
            }
            None => {
                info!("Using in-memory item store");
                Arc::new(MemoryItemStore::new())
            }
        };

        Ok(Self::new(
            store,
            Arc::new(config.jwt_service()),
            Arc::new(ClaimPermissionPolicy),
        ))
    }
}

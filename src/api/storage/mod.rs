//! Storage module for the API.
//!
//! Provides the in-memory and PostgreSQL item stores.

pub mod error;
pub mod traits;

// Storage backend implementations
pub mod memory;
pub mod postgres;

pub use error::StorageError;
pub use memory::MemoryItemStore;
pub use postgres::PostgresItemStore;
pub use traits::ItemStore;

//! Storage trait definitions for probe client records.
//!
//! Defines the async storage interface that the in-memory, SQLite, and
//! PostgreSQL backends implement.

use crate::errors::StorageError;
use crate::registry::types::{ClientMetadata, ClientRecord, NewClient};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Number of fresh identifiers tried before giving up on a create
pub const MAX_ID_ATTEMPTS: usize = 3;

/// Trait for storing and retrieving registered probe clients
///
/// Implementations own their concurrency control. Creates are atomic per
/// record and never reuse an identifier; concurrent updates to one record are
/// applied in whatever order they arrive and the last one wins.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Persist a new client under a freshly generated identifier
    async fn create_client(&self, client: &NewClient) -> Result<String>;

    /// Retrieve a client by ID
    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>>;

    /// Overwrite the mutable fields of an existing client.
    ///
    /// Returns `StorageError::NotFound` when no such client exists.
    async fn update_client(
        &self,
        client_id: &str,
        metadata: &ClientMetadata,
        correlation_token: &str,
    ) -> Result<()>;
}

/// Generate a new opaque client identifier
pub fn generate_client_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

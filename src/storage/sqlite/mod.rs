//! SQLite storage implementations
//!
//! This module provides the SQLite-based client store.
//! SQLite is suitable for single-instance deployments and development.

mod clients;

use crate::errors::StorageError;
use crate::registry::types::{ClientMetadata, ClientRecord, NewClient};
use crate::storage::traits::*;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

pub use clients::SqliteClientStore;

/// SQLite registry storage with embedded migrations
pub struct SqliteClientStorage {
    pool: SqlitePool,
    client_store: SqliteClientStore,
}

impl SqliteClientStorage {
    /// Create a new SQLite storage instance
    pub fn new(pool: SqlitePool) -> Self {
        let client_store = SqliteClientStore::new(pool.clone());
        Self { pool, client_store }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ClientStore for SqliteClientStorage {
    async fn create_client(&self, client: &NewClient) -> Result<String> {
        self.client_store.create_client(client).await
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        self.client_store.get_client(client_id).await
    }

    async fn update_client(
        &self,
        client_id: &str,
        metadata: &ClientMetadata,
        correlation_token: &str,
    ) -> Result<()> {
        self.client_store
            .update_client(client_id, metadata, correlation_token)
            .await
    }
}

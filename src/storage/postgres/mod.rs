//! PostgreSQL storage implementations
//!
//! This module provides the PostgreSQL-based client store.
//! PostgreSQL is suitable for production deployments with high availability requirements.

mod clients;

use crate::errors::StorageError;
use crate::registry::types::{ClientMetadata, ClientRecord, NewClient};
use crate::storage::traits::*;
use async_trait::async_trait;
use sqlx::postgres::PgPool;

pub use clients::PostgresClientStore;

/// PostgreSQL registry storage with embedded migrations
pub struct PostgresClientStorage {
    pool: PgPool,
    client_store: PostgresClientStore,
}

impl PostgresClientStorage {
    /// Create a new PostgreSQL storage instance
    pub fn new(pool: PgPool) -> Self {
        let client_store = PostgresClientStore::new(pool.clone());
        Self { pool, client_store }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ClientStore for PostgresClientStorage {
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

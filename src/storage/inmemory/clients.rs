//! In-memory client storage implementation

use crate::errors::StorageError;
use crate::registry::types::{ClientMetadata, ClientRecord, NewClient};
use crate::storage::traits::*;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

/// In-memory implementation for client storage
#[derive(Default)]
pub struct MemoryClientStorage {
    clients: Mutex<HashMap<String, ClientRecord>>,
}

impl MemoryClientStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under a caller-chosen identifier, refusing identifiers in use
    fn insert_client(&self, client_id: String, client: &NewClient) -> Result<bool> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;

        match clients.entry(client_id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                let now = Utc::now();
                let record = ClientRecord {
                    client_id: entry.key().clone(),
                    metadata: client.metadata.clone(),
                    correlation_token: client.correlation_token.clone(),
                    credential_hash: client.credential_hash.clone(),
                    created_at: now,
                    updated_at: now,
                };
                entry.insert(record);
                Ok(true)
            }
        }
    }
}

#[async_trait]
impl ClientStore for MemoryClientStorage {
    async fn create_client(&self, client: &NewClient) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let client_id = generate_client_id();
            if self.insert_client(client_id.clone(), client)? {
                return Ok(client_id);
            }
        }
        Err(StorageError::IdentifierExhausted(MAX_ID_ATTEMPTS))
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        let clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;
        Ok(clients.get(client_id).cloned())
    }

    async fn update_client(
        &self,
        client_id: &str,
        metadata: &ClientMetadata,
        correlation_token: &str,
    ) -> Result<()> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;

        let record = clients
            .get_mut(client_id)
            .ok_or_else(|| StorageError::NotFound(client_id.to_string()))?;
        record.metadata = metadata.clone();
        record.correlation_token = correlation_token.to_string();
        record.updated_at = Utc::now();
        Ok(())
    }
}

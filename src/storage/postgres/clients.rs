//! PostgreSQL implementation for client storage

use crate::errors::StorageError;
use crate::registry::types::{ClientMetadata, ClientRecord, NewClient};
use crate::storage::traits::*;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use std::collections::BTreeSet;

/// PostgreSQL implementation of client storage
pub struct PostgresClientStore {
    pool: PgPool,
}

impl PostgresClientStore {
    /// Create a new PostgreSQL client store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serialize supported tests to JSON value
    fn serialize_supported_tests(tests: &BTreeSet<String>) -> serde_json::Value {
        serde_json::Value::Array(
            tests
                .iter()
                .map(|test| serde_json::Value::String(test.clone()))
                .collect(),
        )
    }

    /// Deserialize supported tests from JSON value
    fn deserialize_supported_tests(json: serde_json::Value) -> Result<BTreeSet<String>> {
        serde_json::from_value(json).map_err(|e| {
            StorageError::SerializationFailed(format!("Failed to parse supported_tests: {}", e))
        })
    }

    /// Convert PostgreSQL row to ClientRecord
    fn row_to_client(row: &PgRow) -> Result<ClientRecord> {
        let get = |column: &str| -> Result<String> {
            row.try_get(column).map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get {}: {}", column, e))
            })
        };
        let supported_tests: serde_json::Value = row.try_get("supported_tests").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get supported_tests: {}", e))
        })?;

        Ok(ClientRecord {
            client_id: get("client_id")?,
            metadata: ClientMetadata {
                probe_cc: get("probe_cc")?,
                probe_asn: get("probe_asn")?,
                platform: get("platform")?,
                software_name: get("software_name")?,
                software_version: get("software_version")?,
                supported_tests: Self::deserialize_supported_tests(supported_tests)?,
                network_type: get("network_type")?,
                available_bandwidth: get("available_bandwidth")?,
                language: get("language")?,
            },
            correlation_token: get("correlation_token")?,
            credential_hash: get("credential_hash")?,
            created_at: row.try_get("created_at").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get created_at: {}", e))
            })?,
            updated_at: row.try_get("updated_at").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get updated_at: {}", e))
            })?,
        })
    }
}

#[async_trait]
impl ClientStore for PostgresClientStore {
    async fn create_client(&self, client: &NewClient) -> Result<String> {
        let metadata = &client.metadata;
        let supported_tests = Self::serialize_supported_tests(&metadata.supported_tests);

        for _ in 0..MAX_ID_ATTEMPTS {
            let client_id = generate_client_id();
            let now = Utc::now();

            let result = sqlx::query(
                r#"
                INSERT INTO clients (
                    client_id, probe_cc, probe_asn, platform, software_name, software_version,
                    supported_tests, network_type, available_bandwidth, language,
                    correlation_token, credential_hash, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(&client_id)
            .bind(&metadata.probe_cc)
            .bind(&metadata.probe_asn)
            .bind(&metadata.platform)
            .bind(&metadata.software_name)
            .bind(&metadata.software_version)
            .bind(&supported_tests)
            .bind(&metadata.network_type)
            .bind(&metadata.available_bandwidth)
            .bind(&metadata.language)
            .bind(&client.correlation_token)
            .bind(&client.credential_hash)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => return Ok(client_id),
                Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                    tracing::warn!(client_id = %client_id, "client identifier collision, retrying");
                }
                Err(e) => {
                    return Err(StorageError::DatabaseError(format!(
                        "Failed to store client: {}",
                        e
                    )));
                }
            }
        }

        Err(StorageError::IdentifierExhausted(MAX_ID_ATTEMPTS))
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        let row = sqlx::query(
            r#"
            SELECT client_id, probe_cc, probe_asn, platform, software_name, software_version,
                   supported_tests, network_type, available_bandwidth, language,
                   correlation_token, credential_hash, created_at, updated_at
            FROM clients
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(format!("Failed to get client: {}", e)))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_client(
        &self,
        client_id: &str,
        metadata: &ClientMetadata,
        correlation_token: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE clients SET
                probe_cc = $2, probe_asn = $3, platform = $4, software_name = $5,
                software_version = $6, supported_tests = $7, network_type = $8,
                available_bandwidth = $9, language = $10, correlation_token = $11,
                updated_at = $12
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .bind(&metadata.probe_cc)
        .bind(&metadata.probe_asn)
        .bind(&metadata.platform)
        .bind(&metadata.software_name)
        .bind(&metadata.software_version)
        .bind(Self::serialize_supported_tests(&metadata.supported_tests))
        .bind(&metadata.network_type)
        .bind(&metadata.available_bandwidth)
        .bind(&metadata.language)
        .bind(correlation_token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(format!("Failed to update client: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(client_id.to_string()));
        }

        Ok(())
    }
}

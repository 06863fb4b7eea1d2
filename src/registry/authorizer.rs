//! Bearer-token gated metadata updates.

use crate::errors::{RegistryError, StorageError, TokenError};
use crate::registry::registrar::validate_metadata;
use crate::registry::tokens::TokenSigner;
use crate::registry::types::{BearerClaims, ClientData};
use crate::storage::traits::ClientStore;
use chrono::Utc;
use std::sync::Arc;

/// Authorizes and applies client metadata updates
pub struct UpdateAuthorizer {
    storage: Arc<dyn ClientStore>,
    signer: Arc<dyn TokenSigner>,
}

impl UpdateAuthorizer {
    pub fn new(storage: Arc<dyn ClientStore>, signer: Arc<dyn TokenSigner>) -> Self {
        Self { storage, signer }
    }

    /// Check that `token` is genuine, unexpired, and issued to `client_id`
    pub fn authorize(&self, token: &str, client_id: &str) -> Result<BearerClaims, RegistryError> {
        let claims = self.signer.verify(token).inspect_err(|e| {
            tracing::warn!(client_id = %client_id, error = %e, "bearer token rejected");
        })?;

        if claims.is_expired_at(Utc::now()) {
            tracing::warn!(client_id = %client_id, subject = %claims.sub, "expired bearer token");
            return Err(TokenError::Expired.into());
        }

        if claims.sub != client_id {
            tracing::warn!(client_id = %client_id, subject = %claims.sub, "bearer token subject mismatch");
            return Err(RegistryError::Authorization(client_id.to_string()));
        }

        Ok(claims)
    }

    /// Replace the metadata and correlation token of `client_id`.
    ///
    /// Any password carried by `data` is ignored.
    pub async fn update(
        &self,
        token: &str,
        client_id: &str,
        data: &ClientData,
    ) -> Result<(), RegistryError> {
        let claims = self.authorize(token, client_id)?;
        self.apply(&claims, data).await
    }

    /// Store `data` for the subject of already authorized `claims`
    pub async fn apply(&self, claims: &BearerClaims, data: &ClientData) -> Result<(), RegistryError> {
        validate_metadata(&data.metadata)?;

        let client_id = claims.sub.as_str();
        self.storage
            .update_client(client_id, &data.metadata, &data.token)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(id) => RegistryError::NotFound(id),
                other => RegistryError::Storage(other),
            })?;

        tracing::info!(client_id = %client_id, probe_cc = %data.metadata.probe_cc, "updated probe metadata");

        Ok(())
    }
}

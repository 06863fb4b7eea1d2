//! Password login and bearer token issuance.

use crate::errors::RegistryError;
use crate::registry::credentials::CredentialHasher;
use crate::registry::tokens::TokenSigner;
use crate::registry::types::{BearerClaims, IssuedToken};
use crate::storage::traits::ClientStore;
use chrono::Utc;
use std::sync::Arc;

/// Verifies client passwords and mints bearer tokens
pub struct Authenticator {
    storage: Arc<dyn ClientStore>,
    hasher: Arc<dyn CredentialHasher>,
    signer: Arc<dyn TokenSigner>,
    /// Lifetime of every issued token
    lifetime: chrono::Duration,
}

impl Authenticator {
    pub fn new(
        storage: Arc<dyn ClientStore>,
        hasher: Arc<dyn CredentialHasher>,
        signer: Arc<dyn TokenSigner>,
        lifetime: chrono::Duration,
    ) -> Self {
        Self {
            storage,
            hasher,
            signer,
            lifetime,
        }
    }

    /// Exchange a client identifier and password for a bearer token.
    ///
    /// Unknown clients and wrong passwords fail with the same
    /// `RegistryError::Authentication`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, RegistryError> {
        let record = self.storage.get_client(username).await?;

        // Verification is CPU bound, keep it off the async workers
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let credential_hash = record.map(|record| record.credential_hash);
        let verified = tokio::task::spawn_blocking(move || match credential_hash {
            Some(credential_hash) => hasher.verify(&password, &credential_hash),
            None => {
                hasher.verify_decoy(&password);
                false
            }
        })
        .await
        .map_err(|e| RegistryError::Credential(format!("Verification task failed: {}", e)))?;

        if !verified {
            tracing::warn!(client_id = %username, "login rejected");
            return Err(RegistryError::Authentication);
        }

        let claims = BearerClaims::new(username, Utc::now(), self.lifetime);
        let token = self
            .signer
            .sign(&claims)
            .map_err(|e| RegistryError::Credential(e.to_string()))?;

        tracing::info!(client_id = %username, expires_at = %claims.expires_at(), "issued bearer token");

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }
}

//! Probe registration.
//!
//! Validates the submitted client data, derives the password credential and
//! allocates a fresh client identifier.

use crate::errors::RegistryError;
use crate::registry::credentials::CredentialHasher;
use crate::registry::types::{ClientData, ClientMetadata, NewClient};
use crate::storage::traits::ClientStore;
use std::sync::Arc;

/// Registration service
pub struct Registrar {
    storage: Arc<dyn ClientStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl Registrar {
    pub fn new(storage: Arc<dyn ClientStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { storage, hasher }
    }

    /// Register a new probe and return its client identifier.
    ///
    /// Identical submissions are never deduplicated: every call that passes
    /// validation creates a distinct client.
    pub async fn register(&self, data: &ClientData) -> Result<String, RegistryError> {
        validate_metadata(&data.metadata)?;
        if data.password.is_empty() {
            return Err(RegistryError::Validation("password is required".to_string()));
        }

        // Adaptive hashing is CPU bound, keep it off the async workers
        let hasher = self.hasher.clone();
        let password = data.password.clone();
        let credential_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| RegistryError::Credential(format!("Hashing task failed: {}", e)))??;

        let client = NewClient {
            metadata: data.metadata.clone(),
            correlation_token: data.token.clone(),
            credential_hash,
        };

        let client_id = self.storage.create_client(&client).await?;

        tracing::info!(
            client_id = %client_id,
            probe_cc = %data.metadata.probe_cc,
            probe_asn = %data.metadata.probe_asn,
            platform = %data.metadata.platform,
            "registered probe"
        );

        Ok(client_id)
    }
}

/// Check that every metadata field is present and well formed
pub(crate) fn validate_metadata(metadata: &ClientMetadata) -> Result<(), RegistryError> {
    let required = [
        ("probe_cc", &metadata.probe_cc),
        ("probe_asn", &metadata.probe_asn),
        ("platform", &metadata.platform),
        ("software_name", &metadata.software_name),
        ("software_version", &metadata.software_version),
        ("network_type", &metadata.network_type),
        ("available_bandwidth", &metadata.available_bandwidth),
        ("language", &metadata.language),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(RegistryError::Validation(format!("{} is required", field)));
        }
    }

    if metadata.supported_tests.is_empty() {
        return Err(RegistryError::Validation(
            "supported_tests must list at least one test".to_string(),
        ));
    }
    if metadata.supported_tests.iter().any(|test| test.trim().is_empty()) {
        return Err(RegistryError::Validation(
            "supported_tests must not contain empty names".to_string(),
        ));
    }

    if metadata.probe_cc.len() != 2 || !metadata.probe_cc.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(RegistryError::Validation(format!(
            "probe_cc must be a two letter country code, got {:?}",
            metadata.probe_cc
        )));
    }

    let asn_digits = metadata.probe_asn.strip_prefix("AS").unwrap_or_default();
    if asn_digits.is_empty() || !asn_digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(RegistryError::Validation(format!(
            "probe_asn must look like AS1234, got {:?}",
            metadata.probe_asn
        )));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::registry::credentials::Argon2CredentialHasher;
    use crate::registry::types::ClientRecord;
    use crate::storage::MemoryClientStorage;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    pub(crate) fn sample_client_data() -> ClientData {
        ClientData {
            metadata: ClientMetadata {
                probe_cc: "IT".to_string(),
                probe_asn: "AS1234".to_string(),
                platform: "android".to_string(),
                software_name: "ooni-testing".to_string(),
                software_version: "0.0.1".to_string(),
                supported_tests: BTreeSet::from(["web_connectivity".to_string()]),
                network_type: "wifi".to_string(),
                available_bandwidth: "100".to_string(),
                language: "en".to_string(),
            },
            token: "XXXX-TESTING".to_string(),
            password: "testing".to_string(),
        }
    }

    fn create_registrar() -> (Registrar, Arc<MemoryClientStorage>) {
        let storage = Arc::new(MemoryClientStorage::new());
        let registrar = Registrar::new(storage.clone(), Arc::new(Argon2CredentialHasher::new()));
        (registrar, storage)
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(validate_metadata(&sample_client_data().metadata).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut metadata = sample_client_data().metadata;
        metadata.language.clear();
        assert!(matches!(
            validate_metadata(&metadata),
            Err(RegistryError::Validation(reason)) if reason.contains("language")
        ));

        let mut metadata = sample_client_data().metadata;
        metadata.supported_tests.clear();
        assert!(validate_metadata(&metadata).is_err());

        let mut metadata = sample_client_data().metadata;
        metadata.supported_tests.insert(String::new());
        assert!(validate_metadata(&metadata).is_err());
    }

    #[test]
    fn test_validate_country_and_asn_format() {
        for probe_cc in ["ITA", "I", "1T", "ÍT"] {
            let mut metadata = sample_client_data().metadata;
            metadata.probe_cc = probe_cc.to_string();
            assert!(validate_metadata(&metadata).is_err(), "{}", probe_cc);
        }

        for probe_asn in ["1234", "AS", "ASX12", "as1234", "AS12 "] {
            let mut metadata = sample_client_data().metadata;
            metadata.probe_asn = probe_asn.to_string();
            assert!(validate_metadata(&metadata).is_err(), "{}", probe_asn);
        }

        let mut metadata = sample_client_data().metadata;
        metadata.probe_cc = "gr".to_string();
        metadata.probe_asn = "AS0".to_string();
        assert!(validate_metadata(&metadata).is_ok());
    }

    #[tokio::test]
    async fn test_register_stores_hashed_password() {
        let (registrar, storage) = create_registrar();
        let client_id = registrar.register(&sample_client_data()).await.unwrap();

        let record = storage.get_client(&client_id).await.unwrap().unwrap();
        assert_eq!(record.metadata, sample_client_data().metadata);
        assert_eq!(record.correlation_token, "XXXX-TESTING");
        assert_ne!(record.credential_hash, "testing");
        assert!(record.credential_hash.starts_with("$argon2id$"));
    }

    /// Memory store that counts every create it is asked to perform
    #[derive(Default)]
    struct CountingClientStore {
        inner: MemoryClientStorage,
        creates: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ClientStore for CountingClientStore {
        async fn create_client(
            &self,
            client: &NewClient,
        ) -> crate::storage::traits::Result<String> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.inner.create_client(client).await
        }

        async fn get_client(
            &self,
            client_id: &str,
        ) -> crate::storage::traits::Result<Option<ClientRecord>> {
            self.inner.get_client(client_id).await
        }

        async fn update_client(
            &self,
            client_id: &str,
            metadata: &ClientMetadata,
            correlation_token: &str,
        ) -> crate::storage::traits::Result<()> {
            self.inner
                .update_client(client_id, metadata, correlation_token)
                .await
        }
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut metadata = sample_client_data().metadata;
        metadata.platform = " ".to_string();
        assert!(matches!(
            validate_metadata(&metadata),
            Err(RegistryError::Validation(reason)) if reason.contains("platform")
        ));

        let mut metadata = sample_client_data().metadata;
        metadata.language = "\t\n".to_string();
        assert!(validate_metadata(&metadata).is_err());

        let mut metadata = sample_client_data().metadata;
        metadata.supported_tests.insert("  ".to_string());
        assert!(validate_metadata(&metadata).is_err());
    }

    #[tokio::test]
    async fn test_register_rejects_missing_password() {
        let (registrar, _storage) = create_registrar();
        let mut data = sample_client_data();
        data.password.clear();

        let result = registrar.register(&data).await;
        assert!(matches!(result, Err(RegistryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejected_registration_leaves_store_untouched() {
        let storage = Arc::new(CountingClientStore::default());
        let registrar = Registrar::new(storage.clone(), Arc::new(Argon2CredentialHasher::new()));

        let mut missing_password = sample_client_data();
        missing_password.password.clear();
        let mut blank_platform = sample_client_data();
        blank_platform.metadata.platform = "   ".to_string();
        let mut bad_asn = sample_client_data();
        bad_asn.metadata.probe_asn = "1234".to_string();

        for data in [missing_password, blank_platform, bad_asn] {
            let result = registrar.register(&data).await;
            assert!(matches!(result, Err(RegistryError::Validation(_))));
        }
        assert_eq!(storage.creates.load(Ordering::SeqCst), 0);

        registrar.register(&sample_client_data()).await.unwrap();
        assert_eq!(storage.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hashing_does_not_stall_the_runtime() {
        // #[tokio::test] runs on a current-thread runtime, so the timer can
        // only fire while registration yields to the executor
        let (registrar, _storage) = create_registrar();
        let timer = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            Instant::now()
        });

        for _ in 0..3 {
            registrar.register(&sample_client_data()).await.unwrap();
        }
        let finished = Instant::now();

        let woke = timer.await.unwrap();
        assert!(woke < finished);
    }

    #[tokio::test]
    async fn test_register_accepts_empty_correlation_token() {
        let (registrar, storage) = create_registrar();
        let mut data = sample_client_data();
        data.token.clear();

        let client_id = registrar.register(&data).await.unwrap();
        let record = storage.get_client(&client_id).await.unwrap().unwrap();
        assert_eq!(record.correlation_token, "");
    }
}

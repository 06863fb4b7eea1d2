//! Password credential hashing.
//!
//! Passwords are stored as salted adaptive hashes in PHC string format and
//! verified with the constant-time comparison the hashing crate provides.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::RegistryError;

/// Salted adaptive one-way password hashing
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt
    fn hash(&self, password: &str) -> Result<String, RegistryError>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, password: &str, credential_hash: &str) -> bool;

    /// Spend the same work as `verify` without a stored hash to compare against.
    ///
    /// Used when the login identity is unknown so response timing does not
    /// reveal whether the client exists.
    fn verify_decoy(&self, password: &str);
}

/// Argon2id parameters matching `Argon2::default()` with an all-zero digest.
const DECOY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2id credential hasher
#[derive(Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn salt() -> Result<SaltString, RegistryError> {
        use rand::Rng;
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill(&mut bytes);
        SaltString::encode_b64(&bytes)
            .map_err(|e| RegistryError::Credential(format!("Failed to encode salt: {}", e)))
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, RegistryError> {
        let salt = Self::salt()?;
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| RegistryError::Credential(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, credential_hash: &str) -> bool {
        match PasswordHash::new(credential_hash) {
            Ok(hash) => self
                .argon2
                .verify_password(password.as_bytes(), &hash)
                .is_ok(),
            Err(e) => {
                tracing::error!(error = %e, "stored credential hash is not a valid PHC string");
                false
            }
        }
    }

    fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, DECOY_HASH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2CredentialHasher::new();
        let hash = hasher.hash("testing").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("testing"));
        assert!(hasher.verify("testing", &hash));
        assert!(!hasher.verify("Testing", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = Argon2CredentialHasher::new();
        let first = hasher.hash("testing").unwrap();
        let second = hasher.hash("testing").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("testing", &first));
        assert!(hasher.verify("testing", &second));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let hasher = Argon2CredentialHasher::new();
        assert!(!hasher.verify("testing", "plaintext"));
        assert!(!hasher.verify("testing", ""));
    }

    #[test]
    fn test_decoy_hash_is_well_formed() {
        assert!(PasswordHash::new(DECOY_HASH).is_ok());

        let hasher = Argon2CredentialHasher::new();
        assert!(!hasher.verify("testing", DECOY_HASH));
        hasher.verify_decoy("testing");
    }
}

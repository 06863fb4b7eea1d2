//! Bearer token signing and verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::TokenError;
use crate::registry::types::BearerClaims;

/// Signs and verifies bearer claims.
///
/// `verify` only checks the token's structure and signature. Expiry is judged
/// by the caller against its own clock.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &BearerClaims) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<BearerClaims, TokenError>;
}

/// HS256 JWT signer keyed by the process signing secret
pub struct JwtTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, claims: &BearerClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<BearerClaims, TokenError> {
        jsonwebtoken::decode::<BearerClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

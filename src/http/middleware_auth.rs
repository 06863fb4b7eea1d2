//! Bearer credential extraction.

use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::errors::{RegistryError, TokenError};

/// Raw bearer token taken from `Authorization: Bearer <token>`
///
/// Only the header syntax is checked here. Signature, expiry and subject are
/// judged by [`crate::registry::UpdateAuthorizer`].
#[derive(Clone)]
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = RegistryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(TokenError::Missing)?
            .to_str()
            .map_err(|_| TokenError::Malformed("Authorization header is not ASCII".to_string()))?;

        parse_bearer(header).map(BearerToken).map_err(Into::into)
    }
}

/// Split an Authorization header value into its bearer token
fn parse_bearer(header: &str) -> Result<String, TokenError> {
    // Split only on the first space, the scheme is case-insensitive
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| TokenError::Malformed("expected `Bearer <token>`".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed(format!(
            "unsupported authorization scheme {}",
            scheme
        )));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Missing);
    }

    Ok(token.to_string())
}

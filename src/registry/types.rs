//! Probe registry data types: client metadata, stored records, and bearer claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declarative probe attributes reported at registration and on every update
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientMetadata {
    /// Two letter country code of the probe network
    pub probe_cc: String,
    /// Autonomous system number, e.g. `AS1234`
    pub probe_asn: String,
    pub platform: String,
    pub software_name: String,
    pub software_version: String,
    /// Names of the measurements the probe is able to run
    pub supported_tests: BTreeSet<String>,
    pub network_type: String,
    pub available_bandwidth: String,
    pub language: String,
}

/// Registration and update request body sent by probes
///
/// Every field defaults when absent so that incomplete bodies surface as
/// validation errors rather than deserialization rejections.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ClientData {
    #[serde(flatten)]
    pub metadata: ClientMetadata,
    /// Probe-supplied correlation token, purely descriptive
    #[serde(default)]
    pub token: String,
    /// Plaintext password; only meaningful at registration
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for ClientData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientData")
            .field("metadata", &self.metadata)
            .field("token", &self.token)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A client about to be persisted
#[derive(Clone)]
pub struct NewClient {
    pub metadata: ClientMetadata,
    pub correlation_token: String,
    /// PHC-formatted salted password hash
    pub credential_hash: String,
}

/// A persisted client
#[derive(Clone, PartialEq)]
pub struct ClientRecord {
    pub client_id: String,
    pub metadata: ClientMetadata,
    pub correlation_token: String,
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for ClientRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRecord")
            .field("client_id", &self.client_id)
            .field("metadata", &self.metadata)
            .field("correlation_token", &self.correlation_token)
            .field("credential_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Claims carried by a bearer token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerClaims {
    /// Client identifier the token was issued to
    pub sub: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

impl BearerClaims {
    /// Claims for `subject` valid from `issued_at` for `lifetime`
    pub fn new(subject: &str, issued_at: DateTime<Utc>, lifetime: chrono::Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// A token is only valid while its expiry is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// A freshly minted bearer token
#[derive(Clone, Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(rename = "expire")]
    pub expires_at: DateTime<Utc>,
}

/// Login request body
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginRequest {
    /// The client identifier assigned at registration
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

//! Standardized error types following the `error-proteus-<domain>-<number>` format.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use serde_json::json;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("error-proteus-config-1 {0} must be set")]
    EnvVarRequired(String),

    /// Error when PORT cannot be parsed
    #[error("error-proteus-config-2 Parsing HTTP_PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-proteus-config-3 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when duration string cannot be parsed
    #[error("error-proteus-config-4 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when the token lifetime is zero or negative
    #[error("error-proteus-config-5 Token lifetime must be positive: {0}")]
    NonPositiveTokenLifetime(String),

    /// Error when the signing secret is empty
    #[error("error-proteus-config-6 SIGNING_SECRET must not be empty")]
    EmptySigningSecret,
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-proteus-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when query execution fails
    #[error("error-proteus-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when data serialization fails
    #[error("error-proteus-storage-3 Data serialization failed: {0}")]
    SerializationFailed(String),

    /// Error when database operation fails
    #[error("error-proteus-storage-4 Database error: {0}")]
    DatabaseError(String),

    /// Error when data validation fails
    #[error("error-proteus-storage-5 Invalid data: {0}")]
    InvalidData(String),

    /// Error when requested resource is not found
    #[error("error-proteus-storage-6 Not found: {0}")]
    NotFound(String),

    /// Error when no unused client identifier could be allocated
    #[error("error-proteus-storage-7 Client identifier collision after {0} attempts")]
    IdentifierExhausted(usize),
}

/// Bearer token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// No bearer credential was presented
    #[error("error-proteus-token-1 Missing bearer token")]
    Missing,

    /// The credential header or token body could not be parsed
    #[error("error-proteus-token-2 Malformed bearer token: {0}")]
    Malformed(String),

    /// The token was not signed with the configured secret
    #[error("error-proteus-token-3 Bearer token signature invalid")]
    InvalidSignature,

    /// The token is past its expiry
    #[error("error-proteus-token-4 Bearer token expired")]
    Expired,

    /// The token could not be signed
    #[error("error-proteus-token-5 Bearer token signing failed: {0}")]
    SigningFailed(String),
}

/// Registry operation errors surfaced to probes
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Missing or malformed registration or update input
    #[error("error-proteus-registry-1 Invalid client data: {0}")]
    Validation(String),

    /// Unknown client or wrong password, deliberately undifferentiated
    #[error("error-proteus-registry-2 Invalid username or password")]
    Authentication,

    /// Missing, malformed, unsigned or expired bearer token
    #[error("error-proteus-registry-3 {0}")]
    Token(#[from] TokenError),

    /// Valid token whose subject is not the targeted client
    #[error("error-proteus-registry-4 Token subject may not modify client {0}")]
    Authorization(String),

    /// The targeted client does not exist
    #[error("error-proteus-registry-5 Client not found: {0}")]
    NotFound(String),

    /// Password hashing or token signing failure
    #[error("error-proteus-registry-6 Credential processing failed: {0}")]
    Credential(String),

    /// Backing store failure
    #[error("error-proteus-registry-7 {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// Status, error code and caller-safe description for this error
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            RegistryError::Validation(reason) => (
                StatusCode::BAD_REQUEST,
                "invalid_request",
                format!("Invalid client data: {}", reason),
            ),
            RegistryError::Authentication => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password".to_string(),
            ),
            RegistryError::Token(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Missing, invalid or expired bearer token".to_string(),
            ),
            RegistryError::Authorization(_) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Not allowed to modify this client".to_string(),
            ),
            RegistryError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "client_not_found",
                "Client not found".to_string(),
            ),
            RegistryError::Credential(_) | RegistryError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let (status, error, description) = self.parts();

        match &self {
            RegistryError::Credential(_) | RegistryError::Storage(_) => {
                tracing::error!(error = ?self, "internal server error");
            }
            _ => {
                tracing::debug!(error = %self, "request rejected");
            }
        }

        let body = Json(json!({
            "error": error,
            "error_description": description
        }));

        if let RegistryError::Token(_) = self {
            let challenge = HeaderValue::from_static("Bearer error=\"invalid_token\"");
            return (status, [(header::WWW_AUTHENTICATE, challenge)], body).into_response();
        }

        (status, body).into_response()
    }
}

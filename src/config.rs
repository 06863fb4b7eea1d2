//! Environment-based configuration types for the registry server runtime settings.

use anyhow::Result;
use serde::Serialize;

use crate::errors::ConfigError;

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// Bearer token signing secret
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

/// Bearer token lifetime configuration
#[derive(Clone)]
pub struct TokenLifetime(chrono::Duration);

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub signing_secret: SigningSecret,
    pub token_lifetime: TokenLifetime,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let database_url = optional_env("DATABASE_URL");
        let signing_secret: SigningSecret = require_env("SIGNING_SECRET")?.try_into()?;
        let token_lifetime: TokenLifetime = default_env("TOKEN_LIFETIME", "1h").try_into()?;

        Ok(Self {
            version: version()?,
            http_port,
            storage_backend,
            database_url,
            signing_secret,
            token_lifetime,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

/// Version, commit and build date of the running binary
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub commit_hash: Option<String>,
    pub build_date: Option<String>,
}

impl BuildInfo {
    /// Collect build metadata captured by the build script
    pub fn current() -> Result<Self> {
        let build_date = option_env!("PROTEUS_BUILD_TIMESTAMP")
            .and_then(|value| value.parse::<i64>().ok())
            .and_then(|seconds| chrono::DateTime::from_timestamp(seconds, 0))
            .map(|date| date.to_rfc3339());

        Ok(Self {
            version: version()?,
            commit_hash: option_env!("PROTEUS_COMMIT_HASH").map(|val| val.to_string()),
            build_date,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| ConfigError::EnvVarRequired(name.to_string()).into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for SigningSecret {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConfigError::EmptySigningSecret.into());
        }
        Ok(Self(value.into_bytes()))
    }
}

impl AsRef<[u8]> for SigningSecret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<String> for TokenLifetime {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let duration = duration_str::parse(&value)
            .map_err(|e| ConfigError::DurationParsingFailed(value.clone(), e.to_string()))?;
        let duration = chrono::Duration::from_std(duration)?;
        if duration <= chrono::Duration::zero() {
            return Err(ConfigError::NonPositiveTokenLifetime(value).into());
        }
        Ok(Self(duration))
    }
}

impl AsRef<chrono::Duration> for TokenLifetime {
    fn as_ref(&self) -> &chrono::Duration {
        &self.0
    }
}

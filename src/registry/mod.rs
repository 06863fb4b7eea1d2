//! Probe identity registry: registration, password login, and token-gated updates.

pub mod authenticator;
pub mod authorizer;
pub mod credentials;
pub mod registrar;
pub mod tokens;
pub mod types;

pub use authenticator::Authenticator;
pub use authorizer::UpdateAuthorizer;
pub use credentials::{Argon2CredentialHasher, CredentialHasher};
pub use registrar::Registrar;
pub use tokens::{JwtTokenSigner, TokenSigner};
pub use types::*;

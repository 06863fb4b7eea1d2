//! Axum HTTP server handlers and extractors for the probe registry API.

pub mod context;
mod handler_login;
mod handler_register;
mod handler_update;
mod handler_version;
pub mod middleware_auth;
pub mod server;

pub use context::AppState;
pub use middleware_auth::BearerToken;
pub use server::build_router;

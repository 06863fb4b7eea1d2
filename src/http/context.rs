//! Application state shared by request handlers.

use std::sync::Arc;

use crate::config::BuildInfo;
use crate::registry::{Authenticator, Registrar, UpdateAuthorizer};

#[derive(Clone)]
pub struct AppState {
    /// Version metadata reported by the version endpoint
    pub build_info: Arc<BuildInfo>,
    pub registrar: Arc<Registrar>,
    pub authenticator: Arc<Authenticator>,
    pub update_authorizer: Arc<UpdateAuthorizer>,
}

//! Handles GET /api/v1/version

use axum::extract::{Json, State};

use crate::config::BuildInfo;
use crate::http::context::AppState;

pub async fn handle_version(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(state.build_info.as_ref().clone())
}

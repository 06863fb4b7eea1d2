//! Handles POST /api/v1/login - password login returning a bearer token

use axum::extract::{Json, State, rejection::JsonRejection};

use crate::errors::RegistryError;
use crate::http::context::AppState;
use crate::registry::{IssuedToken, LoginRequest};

pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<IssuedToken>, RegistryError> {
    let Json(request) = payload.map_err(|e| RegistryError::Validation(e.body_text()))?;

    let issued = state
        .authenticator
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(issued))
}

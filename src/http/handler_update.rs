//! Handles PUT /api/v1/update/{client_id} - token-gated metadata update

use axum::extract::{Json, Path, State, rejection::JsonRejection};
use serde_json::{Value, json};

use crate::errors::RegistryError;
use crate::http::context::AppState;
use crate::http::middleware_auth::BearerToken;
use crate::registry::ClientData;

pub async fn handle_update(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    BearerToken(token): BearerToken,
    payload: Result<Json<ClientData>, JsonRejection>,
) -> Result<Json<Value>, RegistryError> {
    // Authorization is judged before the body so a bad token never reports as a bad request
    let claims = state.update_authorizer.authorize(&token, &client_id)?;
    let Json(data) = payload.map_err(|e| RegistryError::Validation(e.body_text()))?;

    state.update_authorizer.apply(&claims, &data).await?;

    Ok(Json(json!({ "status": "ok" })))
}

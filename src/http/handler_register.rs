//! Handles POST /api/v1/register - probe registration

use axum::extract::{Json, State, rejection::JsonRejection};
use serde_json::{Value, json};

use crate::errors::RegistryError;
use crate::http::context::AppState;
use crate::registry::ClientData;

pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<ClientData>, JsonRejection>,
) -> Result<Json<Value>, RegistryError> {
    let Json(data) = payload.map_err(|e| RegistryError::Validation(e.body_text()))?;

    let client_id = state.registrar.register(&data).await?;

    Ok(Json(json!({ "client_id": client_id })))
}

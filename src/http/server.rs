//! Main router configuration assembling the registry endpoints.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use super::{
    context::AppState, handler_login::handle_login, handler_register::handle_register,
    handler_update::handle_update, handler_version::handle_version,
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    let api_routes = Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/update/{client_id}", put(handle_update))
        .route("/version", get(handle_version));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

//! Axum router construction for the scenario API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for the browser client.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the scenario server.
///
/// CORS allows any origin so the browser client can be served from
/// elsewhere during development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/events", get(ws::ws_events))
        // REST API
        .route(
            "/api/scenarios",
            get(handlers::get_scenarios)
                .put(handlers::put_scenarios)
                .post(handlers::create_scenario),
        )
        .route("/api/scenarios/{ordinal}", delete(handlers::delete_scenario))
        .route("/api/commands", post(handlers::post_command))
        .route("/api/editor", get(handlers::get_editor))
        .route("/api/layout", get(handlers::get_layout))
        .route("/api/persist", post(handlers::persist))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

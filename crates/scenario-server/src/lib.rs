//! Scenario board API server.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for reading and restoring the scenario document,
//!   creating and deleting scenarios, applying board commands, and reading
//!   the editor form and render layout
//! - **`WebSocket` endpoint** (`/ws/events`) streaming every board event
//!   via [`tokio::sync::broadcast`], and accepting commands from clients
//! - **JSON file store** the document is restored from at startup and
//!   written to on `POST /api/persist`
//!
//! # Architecture
//!
//! A single [`ScenarioBoard`](scenario_core::ScenarioBoard) sits behind a
//! mutex in [`AppState`]. Commands from all clients are applied one at a
//! time and each resulting event is broadcast before the lock is released.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod store;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use startup::{build_state, run, StartupError};
pub use state::AppState;
pub use store::{DocumentStore, StoreError};

//! Server startup: board construction, document restore, and serving.
//!
//! [`run`] is everything the binary does after logging is installed, kept
//! in the library so it can be exercised without a process boundary.

use std::sync::Arc;

use scenario_core::{ConfigError, ScenarioBoard, ScenarioError, StudioConfig};

use crate::server::{start_server, ServerConfig, ServerError};
use crate::state::AppState;
use crate::store::{DocumentStore, StoreError};

/// Errors that can occur while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The configuration is invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The stored document could not be read.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The stored document was read but rejected by the board.
    #[error("restore error: {source}")]
    Restore {
        /// The underlying board error.
        #[from]
        source: ScenarioError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}

/// Build application state from configuration, restoring the stored
/// document if one exists.
///
/// # Errors
///
/// Returns [`StartupError::Store`] if the stored document cannot be read
/// and [`StartupError::Restore`] if the board rejects it.
pub async fn build_state(config: &StudioConfig) -> Result<Arc<AppState>, StartupError> {
    let mut board = ScenarioBoard::from_config(config);
    let store = DocumentStore::new(config.server.store_path.clone());

    if let Some(document) = store.load().await? {
        board.restore(&document)?;
        tracing::info!(
            scenarios = board.manager().len(),
            next_ordinal = %board.manager().next_ordinal(),
            "Scenarios restored from store"
        );
    }

    Ok(Arc::new(AppState::new(board, store)))
}

/// Validate configuration, build state, and serve until shutdown.
///
/// # Errors
///
/// Returns the first startup or serving failure.
pub async fn run(config: &StudioConfig) -> Result<(), StartupError> {
    config.validate()?;
    let state = build_state(config).await?;
    start_server(&ServerConfig::from(&config.server), state).await?;
    Ok(())
}

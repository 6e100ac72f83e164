//! Shared application state for the scenario API server.
//!
//! [`AppState`] owns the one [`ScenarioBoard`] behind a mutex, so commands
//! from every client are applied one at a time, and the broadcast channel
//! that fans each resulting [`BoardEvent`] out to `WebSocket` subscribers.

use std::sync::Arc;

use scenario_core::{ScenarioBoard, ScenarioError};
use scenario_types::{BoardCommand, BoardEvent, ScenarioDocument};
use tokio::sync::{broadcast, Mutex};

use crate::store::DocumentStore;

/// Capacity of the broadcast channel for board events.
///
/// A subscriber that falls behind by more than this many events receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast sender for board events.
    pub tx: broadcast::Sender<BoardEvent>,
    /// The scenario board.
    pub board: Arc<Mutex<ScenarioBoard>>,
    /// Where `POST /api/persist` writes the document.
    pub store: DocumentStore,
}

impl AppState {
    /// Create application state around an existing board.
    pub fn new(board: ScenarioBoard, store: DocumentStore) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            board: Arc::new(Mutex::new(board)),
            store,
        }
    }

    /// Subscribe to board events.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to every subscriber.
    ///
    /// Returns the number of receivers reached; 0 when nobody is listening.
    pub fn broadcast(&self, event: &BoardEvent) -> usize {
        // send fails only when there are no receivers.
        self.tx.send(event.clone()).unwrap_or(0)
    }

    /// Apply a command to the board and broadcast the resulting event.
    ///
    /// The event is published while the board lock is held, so subscribers
    /// observe events in the order commands were applied.
    ///
    /// # Errors
    ///
    /// Returns the board's error; nothing is broadcast in that case.
    pub async fn apply(&self, command: BoardCommand) -> Result<BoardEvent, ScenarioError> {
        let mut board = self.board.lock().await;
        let event = board.apply(command)?;
        self.broadcast(&event);
        Ok(event)
    }

    /// Replace the board's scenarios with `document` and broadcast it.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if the document is
    /// rejected.
    pub async fn restore(&self, document: &ScenarioDocument) -> Result<BoardEvent, ScenarioError> {
        let mut board = self.board.lock().await;
        let event = board.restore(document)?;
        self.broadcast(&event);
        Ok(event)
    }

    /// Snapshot of the current document.
    pub async fn document(&self) -> ScenarioDocument {
        self.board.lock().await.serialize()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ScenarioBoard::default(), DocumentStore::default())
    }
}

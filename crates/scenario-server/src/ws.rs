//! `WebSocket` handler for the board event stream.
//!
//! Clients connect to `GET /ws/events` and receive every [`BoardEvent`] as
//! a JSON text frame, whoever issued the command. Clients may also send
//! [`BoardCommand`]s as text frames; the resulting event arrives through
//! the broadcast like any other, and a rejected command is answered on
//! the same socket with an `{ "error", "status" }` frame.
//!
//! A client that falls behind skips the lagged events and resumes from
//! the newest one.
//!
//! [`BoardEvent`]: scenario_types::BoardEvent

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scenario_types::BoardCommand;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming board events.
///
/// # Route
///
/// `GET /ws/events`
pub async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Forward broadcast events to the socket and apply commands read from it.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("event stream client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                warn!(error = %e, "board event not serializable, skipped");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("event stream client gone (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "event stream client lagged, resuming at newest event");
                    }
                    Err(RecvError::Closed) => {
                        debug!("board event channel closed, ending stream");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("event stream client disconnected");
                        return;
                    }
                    Some(Ok(Message::Text(text))) => {
                        let Some(reply) = apply_frame(&state, text.as_str()).await else {
                            continue;
                        };
                        if socket.send(Message::Text(reply.into())).await.is_err() {
                            debug!("event stream client gone (reply failed)");
                            return;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("event stream client gone (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "event stream socket error");
                        return;
                    }
                    _ => {
                        // Binary and pong frames carry nothing for the board.
                    }
                }
            }
        }
    }
}

/// Apply one command frame. Returns an error frame to send back, or
/// `None` when the command succeeded and its event went out on the
/// broadcast.
async fn apply_frame(state: &AppState, text: &str) -> Option<String> {
    let (status, message) = match serde_json::from_str::<BoardCommand>(text) {
        Ok(command) => match state.apply(command).await {
            Ok(_) => return None,
            Err(e) => {
                let error = ApiError::from(e);
                (error.status(), error.to_string())
            }
        },
        Err(e) => (StatusCode::BAD_REQUEST, format!("malformed command: {e}")),
    };
    let body = serde_json::json!({
        "error": message,
        "status": status.as_u16(),
    });
    Some(body.to_string())
}

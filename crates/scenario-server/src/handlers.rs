//! REST API endpoint handlers for the scenario server.
//!
//! Every mutating handler goes through [`AppState::apply`] or
//! [`AppState::restore`], so REST clients and `WebSocket` subscribers see
//! the same event stream.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/scenarios` | Serialized scenario document |
//! | `PUT` | `/api/scenarios` | Restore from a document |
//! | `POST` | `/api/scenarios` | Create a scenario |
//! | `DELETE` | `/api/scenarios/{ordinal}` | Delete a scenario |
//! | `POST` | `/api/commands` | Apply any board command |
//! | `GET` | `/api/editor` | Current dialogue form |
//! | `GET` | `/api/layout` | Timeline and marker rectangles |
//! | `POST` | `/api/persist` | Write the document to the store |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use scenario_types::{
    BoardCommand, BoardEvent, DialogueForm, ScenarioDocument, ScenarioOrdinal, TimelineLayout,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Response body of `GET /api/editor`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EditorView {
    /// Whether a dialogue is open.
    pub open: bool,
    /// The open dialogue's form.
    pub form: Option<DialogueForm>,
}

/// Response body of `POST /api/persist`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersistReceipt {
    /// File the document was written to.
    pub path: String,
    /// Number of scenarios written.
    pub scenarios: usize,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page with the board status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (scenario_count, intervention_count, editor) = {
        let board = state.board.lock().await;
        let timelines = board.manager().timelines();
        let interventions: usize = timelines.iter().map(scenario_core::Timeline::len).sum();
        let editor = if board.editor().is_open() { "open" } else { "closed" };
        (timelines.len(), interventions, editor)
    };
    let persisted = state
        .store
        .path()
        .map_or_else(|| String::from("memory only"), |p| p.display().to_string());

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Scenario Studio</title>
    <style>
        body {{ font-family: monospace; padding: 2rem; max-width: 720px; margin: 0 auto; }}
        .metric {{ display: inline-block; border: 1px solid #ccc; padding: 0.75rem 1.25rem; margin: 0.25rem; }}
        li::before {{ content: "GET "; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Scenario Studio</h1>
    <div>
        <div class="metric">Scenarios: {scenario_count}</div>
        <div class="metric">Interventions: {intervention_count}</div>
        <div class="metric">Editor: {editor}</div>
    </div>
    <p>Store: {persisted}</p>
    <ul>
        <li><a href="/api/scenarios">/api/scenarios</a></li>
        <li><a href="/api/editor">/api/editor</a></li>
        <li><a href="/api/layout">/api/layout</a></li>
        <li>/ws/events</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// `GET /api/scenarios`
pub async fn get_scenarios(State(state): State<Arc<AppState>>) -> Json<ScenarioDocument> {
    Json(state.document().await)
}

/// `PUT /api/scenarios`
///
/// Replaces every scenario. A rejected document leaves the board as it
/// was.
pub async fn put_scenarios(
    State(state): State<Arc<AppState>>,
    Json(document): Json<ScenarioDocument>,
) -> Result<Json<BoardEvent>, ApiError> {
    Ok(Json(state.restore(&document).await?))
}

/// `POST /api/scenarios`
pub async fn create_scenario(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<BoardEvent>), ApiError> {
    let event = state.apply(BoardCommand::CreateScenario).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `DELETE /api/scenarios/{ordinal}`
pub async fn delete_scenario(
    State(state): State<Arc<AppState>>,
    Path(scenario): Path<ScenarioOrdinal>,
) -> Result<Json<BoardEvent>, ApiError> {
    Ok(Json(
        state.apply(BoardCommand::DeleteScenario { scenario }).await?,
    ))
}

// ---------------------------------------------------------------------------
// Commands and editor
// ---------------------------------------------------------------------------

/// `POST /api/commands`
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<BoardCommand>,
) -> Result<Json<BoardEvent>, ApiError> {
    Ok(Json(state.apply(command).await?))
}

/// `GET /api/editor`
pub async fn get_editor(State(state): State<Arc<AppState>>) -> Json<EditorView> {
    let form = state.board.lock().await.form();
    Json(EditorView {
        open: form.is_some(),
        form,
    })
}

/// `GET /api/layout`
pub async fn get_layout(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TimelineLayout>>, ApiError> {
    Ok(Json(state.board.lock().await.layout()?))
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// `POST /api/persist`
///
/// The snapshot is taken once the store's writer lock is held; the board
/// lock is released before the file is written.
pub async fn persist(State(state): State<Arc<AppState>>) -> Result<Json<PersistReceipt>, ApiError> {
    let (path, scenarios) = state.store.save(state.document()).await?;
    Ok(Json(PersistReceipt {
        path: path.display().to_string(),
        scenarios,
    }))
}

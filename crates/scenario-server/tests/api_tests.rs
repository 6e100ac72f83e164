//! Integration tests for the scenario API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use scenario_server::router::build_router;
use scenario_server::state::AppState;
use scenario_server::store::DocumentStore;
use scenario_types::{BoardEvent, ScenarioOrdinal};
use serde_json::{json, Value};
use tower::ServiceExt;

fn make_router() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::default());
    (build_router(Arc::clone(&state)), state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn command(router: &Router, body: Value) -> (StatusCode, Value) {
    send(router, "POST", "/api/commands", Some(body)).await
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let (router, _) = make_router();
    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_empty_board_serializes_to_empty_array() {
    let (router, _) = make_router();
    let (status, json) = send(&router, "GET", "/api/scenarios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_create_scenario_returns_created() {
    let (router, _) = make_router();
    let (status, json) = send(&router, "POST", "/api/scenarios", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json, json!({ "event": "scenario_created", "scenario": 1 }));
}

#[tokio::test]
async fn test_click_edit_commit_flow() {
    let (router, _) = make_router();
    send(&router, "POST", "/api/scenarios", None).await;

    let (status, opened) = command(
        &router,
        json!({ "command": "open_new", "scenario": 1, "x": 350.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(opened["event"], "editor_opened");
    assert_eq!(opened["form"]["year"], 5);
    assert_eq!(opened["form"]["kind"], "tax");
    assert_eq!(opened["form"]["unit"], "%");

    let (status, updated) = command(
        &router,
        json!({ "command": "update_field", "update": { "field": "magnitude", "value": 12 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["event"], "field_updated");

    let (status, committed) = command(&router, json!({ "command": "commit" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(committed["event"], "intervention_committed");

    let (_, document) = send(&router, "GET", "/api/scenarios", None).await;
    assert_eq!(
        document,
        json!([{
            "scenarioCount": 1,
            "scenarioName": "",
            "interventions": [{ "year": 5, "tax_value": 12.0 }]
        }])
    );
}

#[tokio::test]
async fn test_commit_without_kind_is_unprocessable() {
    let (router, _) = make_router();
    send(&router, "POST", "/api/scenarios", None).await;
    command(&router, json!({ "command": "open_new", "scenario": 1, "x": 350.0 })).await;
    command(
        &router,
        json!({ "command": "update_field", "update": { "field": "kind", "value": null } }),
    )
    .await;

    let (status, json) = command(&router, json!({ "command": "commit" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "product not selected");
    assert_eq!(json["status"], 422);

    let (_, editor) = send(&router, "GET", "/api/editor", None).await;
    assert_eq!(editor["open"], true);
    let (_, document) = send(&router, "GET", "/api/scenarios", None).await;
    assert_eq!(document[0]["interventions"][0]["tax_value"], 0.0);
}

#[tokio::test]
async fn test_commit_with_closed_editor_is_conflict() {
    let (router, _) = make_router();
    let (status, json) = command(&router, json!({ "command": "commit" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], 409);
}

#[tokio::test]
async fn test_editor_closed_by_default() {
    let (router, _) = make_router();
    let (status, json) = send(&router, "GET", "/api/editor", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "open": false, "form": null }));
}

#[tokio::test]
async fn test_delete_unknown_scenario_is_not_found() {
    let (router, _) = make_router();
    let (status, json) = send(&router, "DELETE", "/api/scenarios/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_ordinals_continue_after_delete() {
    let (router, _) = make_router();
    for _ in 0..3 {
        send(&router, "POST", "/api/scenarios", None).await;
    }
    let (status, deleted) = send(&router, "DELETE", "/api/scenarios/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        deleted,
        json!({ "event": "scenario_deleted", "scenario": 2, "interventions_removed": 0 })
    );

    let (_, created) = send(&router, "POST", "/api/scenarios", None).await;
    assert_eq!(created["scenario"], 4);

    let (_, document) = send(&router, "GET", "/api/scenarios", None).await;
    let ordinals: Vec<u64> = document
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["scenarioCount"].as_u64().unwrap())
        .collect();
    assert_eq!(ordinals, vec![1, 3, 4]);
}

#[tokio::test]
async fn test_restore_document() {
    let (router, _) = make_router();
    let document = json!([
        { "scenarioCount": 2, "scenarioName": "carbon", "interventions": [{ "year": 3, "tax_value": 7.5 }] },
        { "scenarioCount": 5, "scenarioName": "", "interventions": [] }
    ]);

    let (status, restored) = send(&router, "PUT", "/api/scenarios", Some(document.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["event"], "document_restored");

    let (_, current) = send(&router, "GET", "/api/scenarios", None).await;
    assert_eq!(current, document);

    let (_, created) = send(&router, "POST", "/api/scenarios", None).await;
    assert_eq!(created["scenario"], 6);
}

#[tokio::test]
async fn test_restore_rejects_duplicate_ordinals() {
    let (router, _) = make_router();
    send(&router, "POST", "/api/scenarios", None).await;

    let document = json!([{ "scenarioCount": 1 }, { "scenarioCount": 1 }]);
    let (status, json) = send(&router, "PUT", "/api/scenarios", Some(document)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (_, current) = send(&router, "GET", "/api/scenarios", None).await;
    assert_eq!(current.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_layout_lists_bars_and_markers() {
    let (router, _) = make_router();
    send(&router, "POST", "/api/scenarios", None).await;
    send(&router, "POST", "/api/scenarios", None).await;
    command(&router, json!({ "command": "open_new", "scenario": 2, "x": 70.0 })).await;

    let (status, layout) = send(&router, "GET", "/api/layout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(layout.as_array().map(Vec::len), Some(2));
    assert_eq!(layout[0]["bar"]["y"], 565.0);
    assert_eq!(layout[1]["bar"]["y"], 530.0);
    assert_eq!(layout[1]["markers"][0]["year"], 1);
}

#[tokio::test]
async fn test_commands_are_broadcast() {
    let (router, state) = make_router();
    let mut rx = state.subscribe();

    send(&router, "POST", "/api/scenarios", None).await;
    command(&router, json!({ "command": "commit" })).await;
    send(&router, "DELETE", "/api/scenarios/1", None).await;

    assert_eq!(
        rx.recv().await.unwrap(),
        BoardEvent::ScenarioCreated { scenario: ScenarioOrdinal(1) }
    );
    // The failed commit is not broadcast.
    assert_eq!(
        rx.recv().await.unwrap(),
        BoardEvent::ScenarioDeleted {
            scenario: ScenarioOrdinal(1),
            interventions_removed: 0,
        }
    );
}

#[tokio::test]
async fn test_persist_without_store_is_conflict() {
    let (router, _) = make_router();
    let (status, json) = send(&router, "POST", "/api/persist", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "no document store configured");
}

#[tokio::test]
async fn test_persist_writes_document() {
    let dir = std::env::temp_dir().join(format!("scenario_api_persist_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scenarios.json");

    let state = Arc::new(AppState::new(
        scenario_core::ScenarioBoard::default(),
        DocumentStore::new(Some(path.clone())),
    ));
    let router = build_router(state);
    send(&router, "POST", "/api/scenarios", None).await;

    let (status, receipt) = send(&router, "POST", "/api/persist", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["scenarios"], 1);

    let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!([{ "scenarioCount": 1, "scenarioName": "", "interventions": [] }])
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_malformed_command_is_rejected() {
    let (router, _) = make_router();
    let request = Request::post("/api/commands")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"command":"explode"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_persists_keep_latest_document() {
    let dir = std::env::temp_dir().join(format!("scenario_api_overlap_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scenarios.json");

    let state = Arc::new(AppState::new(
        scenario_core::ScenarioBoard::default(),
        DocumentStore::new(Some(path.clone())),
    ));
    let router = build_router(state);

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let creator = router.clone();
        tasks.push(tokio::spawn(async move {
            send(&creator, "POST", "/api/scenarios", None).await.0
        }));
        let persister = router.clone();
        tasks.push(tokio::spawn(async move {
            send(&persister, "POST", "/api/persist", None).await.0
        }));
    }
    for task in tasks {
        let status = task.await.unwrap();
        assert!(status.is_success(), "unexpected status {status}");
    }

    let (status, _) = send(&router, "POST", "/api/persist", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, current) = send(&router, "GET", "/api/scenarios", None).await;
    let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written, current);
    assert_eq!(current.as_array().map(Vec::len), Some(16));

    let staged = std::fs::read_dir(&dir)
        .unwrap()
        .filter(|entry| entry.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(staged, 0);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_viewport_click_places_and_reopens() {
    let (router, _) = make_router();
    send(&router, "POST", "/api/scenarios", None).await;

    let (status, opened) = command(&router, json!({ "command": "click", "x": 500.0, "y": 570.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(opened["form"]["year"], 5);
    assert_eq!(opened["form"]["is_new"], true);

    command(
        &router,
        json!({ "command": "update_field", "update": { "field": "kind", "value": "subsidy" } }),
    )
    .await;
    command(&router, json!({ "command": "commit" })).await;

    let (status, reopened) = command(&router, json!({ "command": "click", "x": 500.0, "y": 570.0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reopened["form"]["is_new"], false);
    assert_eq!(reopened["form"]["kind"], "subsidy");
    assert_eq!(reopened["form"]["target"], opened["form"]["target"]);

    command(&router, json!({ "command": "cancel" })).await;
    let (status, missed) = command(&router, json!({ "command": "click", "x": 10.0, "y": 10.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(missed["status"], 400);
}

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use chain_alarm::{
    chain::{ChainState, RemoteSnapshot},
    create_router,
    services::{AlarmEmitter, FetchError, StatusProvider},
    state::Mode,
    AppState, Session,
};

struct SilentAlarm;

impl AlarmEmitter for SilentAlarm {
    fn signal(&self, _volume_percent: u8) {}
}

struct NoChainProvider;

#[async_trait]
impl StatusProvider for NoChainProvider {
    async fn fetch(&self, _credential: &str) -> Result<Option<RemoteSnapshot>, FetchError> {
        Ok(Some(RemoteSnapshot::new(0, 0, 0)))
    }
}

fn app() -> Router {
    let session = Arc::new(Session::spawn(
        ChainState::default(),
        String::new(),
        Arc::new(NoChainProvider),
        Arc::new(SilentAlarm),
    ));
    create_router(Arc::new(AppState::new(session, 20560, "127.0.0.1".to_string())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::put(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_starts_stopped_at_full_duration() {
    let app = app();
    let (status, body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chain"]["remaining_seconds"], 300);
    assert_eq!(body["chain"]["display"], "5:00");
    assert_eq!(body["chain"]["status"], "stopped");
    assert_eq!(body["chain"]["mode"], "manual");
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test]
async fn timer_commands_round_trip() {
    let app = app();

    let (status, body) = send(&app, post("/timer/start")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["chain"]["is_running"], true);

    let (_, body) = send(&app, post("/timer/stop")).await;
    assert_eq!(body["chain"]["is_running"], false);
    assert_eq!(body["status"], "stopped");

    let (_, body) = send(&app, post("/timer/reset")).await;
    assert_eq!(body["chain"]["remaining_seconds"], 300);

    let (_, body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(body["last_action"], "reset");
}

#[tokio::test]
async fn settings_update_applies_valid_values() {
    let app = app();
    let (status, body) = send(
        &app,
        put_json("/settings", json!({ "threshold": 120, "volume": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chain"]["primary_threshold"], 120);
    assert_eq!(body["chain"]["volume"], 0);
}

#[tokio::test]
async fn settings_update_rejects_invalid_values_atomically() {
    let app = app();
    let (status, body) = send(
        &app,
        put_json("/settings", json!({ "threshold": 45, "volume": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");

    let (_, body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(body["chain"]["primary_threshold"], 60);
    assert_eq!(body["chain"]["volume"], 80);
}

#[tokio::test]
async fn settings_mode_switch_resets_timer() {
    let app = app();
    send(&app, post("/timer/start")).await;

    let (status, body) = send(&app, put_json("/settings", json!({ "mode": "synced" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chain"]["mode"], "synced");
    assert_eq!(body["chain"]["is_running"], false);
    assert_eq!(
        serde_json::from_value::<Mode>(body["chain"]["mode"].clone()).unwrap(),
        Mode::Synced
    );
}

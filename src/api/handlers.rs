//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::{error, warn};

use crate::{
    chain::Event,
    state::{app_state::StateError, AppState},
};
use super::responses::{ApiResponse, HealthResponse, SettingsRequest, StatusResponse};

/// Handle POST /timer/start - Start the manual countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StateError> {
    let chain = state.command("start", Event::Start).await.inspect_err(|e| {
        error!("Failed to start timer: {}", e);
    })?;
    Ok(Json(ApiResponse::new("Timer started".to_string(), chain)))
}

/// Handle POST /timer/reset - Reload the full chain duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StateError> {
    let chain = state.command("reset", Event::Reset).await.inspect_err(|e| {
        error!("Failed to reset timer: {}", e);
    })?;
    Ok(Json(ApiResponse::new("Timer reset".to_string(), chain)))
}

/// Handle POST /timer/stop - Stop the manual countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StateError> {
    let chain = state.command("stop", Event::Stop).await.inspect_err(|e| {
        error!("Failed to stop timer: {}", e);
    })?;
    Ok(Json(ApiResponse::new("Timer stopped".to_string(), chain)))
}

/// Handle PUT /settings - Validate and apply new settings
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<ApiResponse>, StateError> {
    let chain = state.update_settings(request.into()).await.inspect_err(|e| {
        warn!("Rejected settings update: {}", e);
    })?;
    Ok(Json(ApiResponse::new("Settings updated".to_string(), chain)))
}

/// Handle GET /status - Return current chain status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        chain: state.session.view(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

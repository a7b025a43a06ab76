//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{app_state::{SettingsUpdate, StateError}, ChainView, Mode};

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub chain: ChainView,
}

impl ApiResponse {
    /// Create a new API response; the status mirrors the chain status
    pub fn new(message: String, chain: ChainView) -> Self {
        Self {
            status: chain.status.to_string(),
            message,
            timestamp: Utc::now(),
            chain,
        }
    }
}

/// Body of PUT /settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsRequest {
    pub threshold: Option<i64>,
    pub volume: Option<i64>,
    pub mode: Option<Mode>,
    pub api_key: Option<String>,
}

impl From<SettingsRequest> for SettingsUpdate {
    fn from(request: SettingsRequest) -> Self {
        Self {
            threshold: request.threshold,
            volume: request.volume,
            mode: request.mode,
            api_key: request.api_key,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub chain: ChainView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for StateError {
    fn into_response(self) -> Response {
        let code = match self {
            StateError::Settings(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StateError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
        };
        (code, Json(body)).into_response()
    }
}

//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use super::{ChainView, Mode};
use crate::{
    chain::Event,
    config::{validate_threshold, validate_volume, SettingsError},
    tasks::{Session, SessionError},
};

/// Errors surfaced by HTTP-facing state operations
#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Settings change request. Every field is optional; values are validated
/// before any of them is applied.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub threshold: Option<i64>,
    pub volume: Option<i64>,
    pub mode: Option<Mode>,
    pub api_key: Option<String>,
}

/// Main application state shared with HTTP handlers
pub struct AppState {
    /// Chain session owning the countdown
    pub session: Arc<Session>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState around a spawned session
    pub fn new(session: Arc<Session>, port: u16, host: String) -> Self {
        Self {
            session,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Remember the most recent user action for the status endpoint
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Run a manual timer command and record it
    pub async fn command(&self, action: &str, event: Event) -> Result<ChainView, StateError> {
        info!("Timer command: {}", action);
        let view = self.session.dispatch(event).await?;
        self.record_action(action);
        Ok(view)
    }

    /// Validate and apply a settings change.
    ///
    /// Persisting the new values is left to whoever called this.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<ChainView, StateError> {
        let threshold = update.threshold.map(validate_threshold).transpose()?;
        let volume = update.volume.map(validate_volume).transpose()?;

        if let Some(threshold) = threshold {
            info!("Setting primary threshold to {}s", threshold);
            self.session.dispatch(Event::SetThreshold(threshold)).await?;
        }
        if let Some(volume) = volume {
            info!("Setting alarm volume to {}%", volume);
            self.session.dispatch(Event::SetVolume(volume)).await?;
        }
        if let Some(api_key) = update.api_key {
            self.session.set_credential(api_key);
        }
        if let Some(mode) = update.mode {
            self.session.set_mode(mode).await?;
        }

        self.record_action("settings");
        Ok(self.session.view())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

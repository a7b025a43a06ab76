//! Chain session: the single owner of the chain state
//!
//! Every change to the chain state travels as a [`Message`] through one mpsc
//! channel and is applied by one task, so ticks, snapshots and commands never
//! interleave. The resulting [`ChainView`] is published on a watch channel.

use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::drivers::{manual_driver, synced_driver};
use crate::{
    chain::{ChainState, Effect, Event},
    services::{AlarmEmitter, StatusProvider},
    state::{ChainView, Mode},
};

const COMMAND_BUFFER: usize = 64;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Chain state owner has shut down")]
    Closed,
}

/// Input to the state owner
#[derive(Debug)]
pub enum Message {
    Apply {
        event: Event,
        reply: Option<oneshot::Sender<ChainView>>,
    },
    /// A poll failed; recorded for display only
    FetchFailed(String),
    /// A poll succeeded without chain data; clears any displayed error
    PollSucceeded,
}

impl Message {
    pub fn event(event: Event) -> Self {
        Message::Apply { event, reply: None }
    }
}

struct Driver {
    mode: Mode,
    handle: JoinHandle<()>,
}

impl Driver {
    async fn shutdown(self) {
        self.handle.abort();
        // Wait until the task is gone so two drivers never overlap
        let _ = self.handle.await;
        debug!("{:?} driver stopped", self.mode);
    }
}

/// Handle to a running chain session
pub struct Session {
    tx: mpsc::Sender<Message>,
    view_rx: watch::Receiver<ChainView>,
    provider: Arc<dyn StatusProvider>,
    credential: Arc<RwLock<String>>,
    driver: Mutex<Option<Driver>>,
}

impl Session {
    /// Spawn the state owner. No driver runs until [`start`](Self::start).
    pub fn spawn(
        initial: ChainState,
        credential: String,
        provider: Arc<dyn StatusProvider>,
        alarm: Arc<dyn AlarmEmitter>,
    ) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (view_tx, view_rx) = watch::channel(ChainView::new(&initial, None));

        tokio::spawn(state_owner_task(initial, rx, view_tx, alarm));

        Self {
            tx,
            view_rx,
            provider,
            credential: Arc::new(RwLock::new(credential)),
            driver: Mutex::new(None),
        }
    }

    /// Start the driver for the current mode. No-op if one is running.
    pub async fn start(&self) {
        let mut driver = self.driver.lock().await;
        if driver.is_none() {
            *driver = Some(self.spawn_driver(self.view().mode));
        }
    }

    /// Stop the running driver. No-op if none is running.
    pub async fn stop(&self) {
        let mut driver = self.driver.lock().await;
        if let Some(current) = driver.take() {
            current.shutdown().await;
        }
    }

    /// Mode of the running driver, if any
    pub async fn driving(&self) -> Option<Mode> {
        self.driver.lock().await.as_ref().map(|driver| driver.mode)
    }

    /// Switch between manual and synced mode.
    ///
    /// The old driver is fully stopped before the mode changes and the new
    /// driver starts, all under the driver lock.
    pub async fn set_mode(&self, mode: Mode) -> Result<ChainView, SessionError> {
        let mut driver = self.driver.lock().await;
        let current_mode = self.view().mode;
        if mode == current_mode {
            debug!("Already in {:?} mode, keeping the running driver", mode);
            return Ok(self.view());
        }
        let was_running = driver.is_some();

        if let Some(current) = driver.take() {
            current.shutdown().await;
        }

        let view = self.send(Event::SetMode(mode)).await;

        if was_running {
            *driver = Some(self.spawn_driver(mode));
        }

        view
    }

    /// Apply one event and return the resulting view
    pub async fn dispatch(&self, event: Event) -> Result<ChainView, SessionError> {
        match event {
            Event::SetMode(mode) => self.set_mode(mode).await,
            event => self.send(event).await,
        }
    }

    pub async fn start_timer(&self) -> Result<ChainView, SessionError> {
        self.dispatch(Event::Start).await
    }

    pub async fn reset_timer(&self) -> Result<ChainView, SessionError> {
        self.dispatch(Event::Reset).await
    }

    pub async fn stop_timer(&self) -> Result<ChainView, SessionError> {
        self.dispatch(Event::Stop).await
    }

    /// Replace the credential used by subsequent polls
    pub fn set_credential(&self, credential: String) {
        let mut current = self.credential.write().unwrap_or_else(|e| e.into_inner());
        *current = credential;
        info!("API key updated");
    }

    /// Current view of the chain
    pub fn view(&self) -> ChainView {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified after every applied change
    pub fn subscribe(&self) -> watch::Receiver<ChainView> {
        self.view_rx.clone()
    }

    async fn send(&self, event: Event) -> Result<ChainView, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Apply {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    fn spawn_driver(&self, mode: Mode) -> Driver {
        let tx = self.tx.clone();
        let handle = match mode {
            Mode::Manual => tokio::spawn(manual_driver(tx)),
            Mode::Synced => tokio::spawn(synced_driver(
                tx,
                Arc::clone(&self.provider),
                Arc::clone(&self.credential),
            )),
        };
        Driver { mode, handle }
    }
}

/// Apply messages one at a time, publish the view, then run effects
pub async fn state_owner_task(
    mut state: ChainState,
    mut rx: mpsc::Receiver<Message>,
    view_tx: watch::Sender<ChainView>,
    alarm: Arc<dyn AlarmEmitter>,
) {
    info!("Starting chain state owner");

    let mut last_error: Option<String> = None;

    while let Some(message) = rx.recv().await {
        match message {
            Message::Apply { event, reply } => {
                if matches!(event, Event::Snapshot(_) | Event::SetMode(_)) {
                    last_error = None;
                }

                let (next, effects) = state.apply(event);
                state = next;

                let view = ChainView::new(&state, last_error.clone());
                view_tx.send_replace(view.clone());

                for effect in effects {
                    match effect {
                        Effect::FireAlarm { volume } => {
                            info!(
                                "Threshold crossed at {}s remaining",
                                state.timer.remaining_seconds
                            );
                            alarm.signal(volume);
                        }
                    }
                }

                if let Some(reply) = reply {
                    let _ = reply.send(view);
                }
            }
            Message::FetchFailed(error) => {
                if last_error.as_deref() != Some(error.as_str()) {
                    warn!("Chain status unavailable: {}", error);
                }
                last_error = Some(error);
                view_tx.send_replace(ChainView::new(&state, last_error.clone()));
            }
            Message::PollSucceeded => {
                if last_error.take().is_some() {
                    info!("Chain status available again");
                    view_tx.send_replace(ChainView::new(&state, None));
                }
            }
        }
    }

    info!("Chain state owner stopped");
}

//! Periodic drivers feeding events into the session
//!
//! Exactly one driver runs at a time. The manual driver only ticks; the
//! synced driver ticks and polls the remote provider on its own cadence.

use std::{
    sync::{Arc, RwLock},
    time::Duration,
};
use tokio::{sync::mpsc, time::interval};
use tracing::{debug, info, warn};

use super::session::Message;
use crate::{chain::Event, services::StatusProvider};

/// Local clock cadence
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Remote poll cadence, independent of how often the provider refreshes
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Tick once a second until the session goes away
pub async fn manual_driver(tx: mpsc::Sender<Message>) {
    info!("Starting manual clock driver");

    let mut ticker = interval(TICK_INTERVAL);
    // The first tick of an interval completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if tx.send(Message::event(Event::Tick)).await.is_err() {
            debug!("Session closed, manual driver exiting");
            break;
        }
    }
}

/// Tick once a second and poll the provider every five seconds.
///
/// Fetch failures are handed to the session as display errors and the next
/// poll goes ahead on schedule.
pub async fn synced_driver(
    tx: mpsc::Sender<Message>,
    provider: Arc<dyn StatusProvider>,
    credential: Arc<RwLock<String>>,
) {
    info!("Starting synced driver (poll every {}s)", POLL_INTERVAL.as_secs());

    let mut ticker = interval(TICK_INTERVAL);
    let mut poller = interval(POLL_INTERVAL);
    ticker.tick().await;

    loop {
        let message = tokio::select! {
            _ = ticker.tick() => Message::event(Event::Tick),

            _ = poller.tick() => {
                let key = credential
                    .read()
                    .map(|key| key.clone())
                    .unwrap_or_else(|e| e.into_inner().clone());

                match provider.fetch(&key).await {
                    Ok(Some(snapshot)) => {
                        debug!("Fetched chain snapshot: {:?}", snapshot);
                        Message::event(Event::Snapshot(snapshot))
                    }
                    Ok(None) => {
                        debug!("Poll returned no chain data");
                        Message::PollSucceeded
                    }
                    Err(e) => {
                        warn!("Failed to fetch chain status: {}", e);
                        Message::FetchFailed(e.to_string())
                    }
                }
            }
        };

        if tx.send(message).await.is_err() {
            debug!("Session closed, synced driver exiting");
            break;
        }
    }
}

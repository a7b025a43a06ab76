//! Alarm emission

use std::{
    io::Write,
    sync::Mutex,
    time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, info};

/// How long one alarm keeps sounding
pub const ALARM_DURATION: Duration = Duration::from_millis(1500);

const BEEP_SPACING: Duration = Duration::from_millis(250);

/// Receiver of fire requests from the chain engine
pub trait AlarmEmitter: Send + Sync {
    /// Fire-and-forget. A volume of zero is a silent no-op.
    fn signal(&self, volume_percent: u8);
}

/// Rings the terminal bell for [`ALARM_DURATION`].
///
/// Requests that arrive while an alarm is still sounding replace it rather
/// than queueing behind it, so overlapping crossings never stack.
#[derive(Debug)]
pub struct BellAlarm {
    duration: Duration,
    sounding: Mutex<Option<JoinHandle<()>>>,
}

impl BellAlarm {
    pub fn new() -> Self {
        Self::with_duration(ALARM_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            sounding: Mutex::new(None),
        }
    }

    /// Whether an alarm is currently sounding
    pub fn is_sounding(&self) -> bool {
        self.sounding
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for BellAlarm {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmEmitter for BellAlarm {
    fn signal(&self, volume_percent: u8) {
        if volume_percent == 0 {
            debug!("Alarm requested at zero volume, staying silent");
            return;
        }

        let mut sounding = self.sounding.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = sounding.take() {
            if !previous.is_finished() {
                debug!("Alarm already sounding, restarting it");
            }
            previous.abort();
        }

        info!("Chain alarm at {}% volume", volume_percent);
        *sounding = Some(tokio::spawn(ring(self.duration)));
    }
}

async fn ring(duration: Duration) {
    let deadline = Instant::now() + duration;
    let mut interval = tokio::time::interval(BEEP_SPACING);

    while Instant::now() < deadline {
        interval.tick().await;
        let mut stderr = std::io::stderr();
        // BEL
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

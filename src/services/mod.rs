//! External collaborators module
//! 
//! This module contains the remote status provider client and the alarm
//! emitter the chain engine signals.

pub mod alarm;
pub mod provider;

// Re-export main types
pub use alarm::{AlarmEmitter, BellAlarm};
pub use provider::{FetchError, HttpStatusProvider, StatusProvider};

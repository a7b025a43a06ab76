//! Background tasks module
//! 
//! This module contains the chain session that owns all state, and the
//! periodic drivers that feed it ticks and remote snapshots.

pub mod drivers;
pub mod session;

// Re-export main types
pub use drivers::{manual_driver, synced_driver, POLL_INTERVAL, TICK_INTERVAL};
pub use session::{Message, Session, SessionError};

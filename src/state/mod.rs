//! State management module
//! 
//! This module contains the timer data model, the display view and the
//! shared application state handed to HTTP handlers.

pub mod app_state;
pub mod timer_state;
pub mod view;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{EdgeState, Mode, TimerState, FULL_DURATION_SECS};
pub use view::{format_remaining, ChainView};

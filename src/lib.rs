//! Chain Alarm - A state-managed HTTP server that watches a game chain timer
//! 
//! This library reconciles a local one-second countdown with a periodically
//! polled remote authority and decides exactly when threshold alarms fire.

pub mod api;
pub mod chain;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use tasks::Session;
pub use utils::signals::shutdown_signal;

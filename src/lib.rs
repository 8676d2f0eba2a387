//! Theater Time - show timers and switches for live events
//!
//! This library keeps an ordered list of show timers and switches, serves
//! them over HTTP, mirrors them onto an OSC control bus, and persists the
//! whole show so a restart can resume mid-performance.

pub mod api;
pub mod config;
pub mod error;
pub mod osc;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{ConfigError, WireError};
pub use state::{AppState, Changes, ShowState};
pub use utils::signals::shutdown_signal;

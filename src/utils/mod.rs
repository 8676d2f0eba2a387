//! Utility functions module
//!
//! Shutdown signal handling and timestamp helpers used across the crate.

pub mod signals;
pub mod time;

// Re-export main functions
pub use signals::shutdown_signal;

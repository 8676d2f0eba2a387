//! External side effects
//!
//! Outbound OSC datagrams and show/snapshot file access. Nothing in here
//! mutates the show state.

pub mod osc_sender;
pub mod show_file;

// Re-export main functions
pub use osc_sender::OscSender;
pub use show_file::{load_show, write_snapshot};

//! OSC control bus
//!
//! Encoding of status bundles and telemetry, decoding of inbound control
//! messages, and dispatch of those messages onto the show state.

pub mod decode;
pub mod dispatch;
pub mod encode;

/// First address segment of every message this server sends or accepts
pub const NAMESPACE: &str = "theaterTime";

// Re-export main types
pub use decode::{parse_command, Command, SwitchAction, TimerAction};
pub use dispatch::{dispatch, handle_datagram};

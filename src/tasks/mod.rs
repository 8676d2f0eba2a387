//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server:
//! the OSC listener, the OSC status and telemetry senders, and the state writer.

pub mod osc_listener;
pub mod osc_status;
pub mod state_writer;
pub mod telemetry;

// Re-export main functions
pub use osc_listener::osc_listener_task;
pub use osc_status::osc_status_task;
pub use state_writer::state_writer_task;
pub use telemetry::telemetry_task;

//! State management module
//!
//! Timers, switches and the show aggregate that owns them, plus the
//! snapshot and document formats the show is built from.

pub mod app_state;
pub mod document;
pub mod show_state;
pub mod slug;
pub mod snapshot;
pub mod switch;
pub mod timer;

// Re-export main types
pub use app_state::AppState;
pub use document::{parse_show_date, ShowDocument};
pub use show_state::{Changes, HttpConfig, OscConfig, ShowMeta, ShowState, ShowView};
pub use snapshot::ShowSnapshot;
pub use switch::Switch;
pub use timer::{
    is_valid_count_minutes, Direction, LiveDetail, Timer, TimerKind, TimerRecord, TimerType,
    MAX_COUNT_MINUTES,
};

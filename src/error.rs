//! Error types for the configuration and wire boundaries

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while building the show at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("show file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("saved state parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid show date '{0}', expected YYYY-MM-DD or 'today'")]
    InvalidDate(String),

    #[error("invalid show time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("a .toml show file needs a date and a time; usage: theater-time <file.toml> <date> <time>")]
    MissingShowStart,

    #[error("show start '{0}' does not exist in the local timezone")]
    NonexistentLocalTime(String),

    #[error("count-down timer '{0}' has no timeTarget")]
    MissingTimeTarget(String),

    #[error("timer '{title}' has an invalid count of {minutes} minutes, expected 1 to {max}", max = crate::state::MAX_COUNT_MINUTES)]
    InvalidCountMinutes { title: String, minutes: i64 },

    #[error("unknown show source '{0}', expected a .toml or .json file")]
    UnknownSource(PathBuf),

    #[error("saved state not found at {0}; usage: theater-time <file.toml> <date> <time>")]
    SavedStateNotFound(PathBuf),
}

/// Recoverable errors on the OSC control bus
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed OSC packet: {0}")]
    Decode(String),

    #[error("failed to encode OSC packet: {0}")]
    Encode(String),

    #[error("could not build bundle timetag: {0}")]
    Timetag(String),

    #[error("non-numeric switch index '{0}'")]
    BadIndex(String),
}

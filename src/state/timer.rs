//! Show timers: count-up, count-down and absolute-deadline count-down
//!
//! All three variants share one record layout. The variant only changes how
//! activation sets the deadline and which instant telemetry counts against.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::utils::time::{floor_seconds, iso_opt, minutes_opt};

/// Longest count-down a show may configure: one year
pub const MAX_COUNT_MINUTES: i64 = 366 * 24 * 60;

/// Whether `minutes` is a usable count-down length
pub fn is_valid_count_minutes(minutes: i64) -> bool {
    (1..=MAX_COUNT_MINUTES).contains(&minutes)
}

/// Wire/persistence name of a timer variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerType {
    CountUp,
    CountDown,
    AbsoluteDown,
}

/// Variant-specific behavior and parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Elapsed time since activation
    CountUp,
    /// Fixed duration, deadline set on each activation
    CountDown { minutes: i64 },
    /// Deadline fixed at construction, usually the show start
    AbsoluteDown,
}

impl TimerKind {
    pub fn timer_type(&self) -> TimerType {
        match self {
            TimerKind::CountUp => TimerType::CountUp,
            TimerKind::CountDown { .. } => TimerType::CountDown,
            TimerKind::AbsoluteDown => TimerType::AbsoluteDown,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            TimerKind::CountUp => Direction::Up,
            TimerKind::CountDown { .. } | TimerKind::AbsoluteDown => Direction::Down,
        }
    }
}

/// Which way the displayed number moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
        }
    }
}

/// Minimal projection of the running timer for outbound telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDetail {
    pub title: String,
    pub whole_seconds: i64,
    pub direction: Direction,
}

/// Serialized form of a timer, used for persistence and the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    #[serde(default, with = "iso_opt")]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_opt")]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_opt")]
    pub date_target: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extras: Vec<String>,
    pub has_run: bool,
    pub id: String,
    pub is_complete: bool,
    pub is_on: bool,
    #[serde(default)]
    pub reset_switch: Vec<String>,
    pub time_remain: Option<i64>,
    #[serde(default, deserialize_with = "minutes_opt::deserialize")]
    pub time_target: Option<i64>,
    pub title: String,
    #[serde(rename = "type")]
    pub timer_type: TimerType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    id: String,
    title: String,
    kind: TimerKind,
    has_run: bool,
    is_on: bool,
    is_complete: bool,
    date_start: Option<DateTime<Utc>>,
    date_end: Option<DateTime<Utc>>,
    date_target: Option<DateTime<Utc>>,
    time_remain: Option<i64>,
    reset_switch: Vec<String>,
    extras: Vec<String>,
}

impl Timer {
    fn inert(id: String, title: String, kind: TimerKind, extras: Vec<String>) -> Self {
        Self {
            id,
            title,
            kind,
            has_run: false,
            is_on: false,
            is_complete: false,
            date_start: None,
            date_end: None,
            date_target: None,
            time_remain: None,
            reset_switch: Vec::new(),
            extras,
        }
    }

    pub fn count_up(id: String, title: String, extras: Vec<String>) -> Self {
        Self::inert(id, title, TimerKind::CountUp, extras)
    }

    pub fn count_down(id: String, title: String, minutes: i64, extras: Vec<String>) -> Self {
        Self::inert(id, title, TimerKind::CountDown { minutes }, extras)
    }

    /// Absolute deadline timer; the caller decides when it first activates
    pub fn absolute_down(
        id: String,
        title: String,
        target: Option<DateTime<Utc>>,
        extras: Vec<String>,
    ) -> Self {
        let mut timer = Self::inert(id, title, TimerKind::AbsoluteDown, extras);
        timer.date_target = target;
        timer
    }

    /// Restore a timer from a previously produced record, verbatim
    pub fn rehydrate(record: TimerRecord) -> Result<Self, ConfigError> {
        let kind = match record.timer_type {
            TimerType::CountUp => TimerKind::CountUp,
            TimerType::AbsoluteDown => TimerKind::AbsoluteDown,
            TimerType::CountDown => {
                let minutes = record
                    .time_target
                    .ok_or_else(|| ConfigError::MissingTimeTarget(record.id.clone()))?;
                if !is_valid_count_minutes(minutes) {
                    return Err(ConfigError::InvalidCountMinutes {
                        title: record.title,
                        minutes,
                    });
                }
                TimerKind::CountDown { minutes }
            }
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            kind,
            has_run: record.has_run,
            is_on: record.is_on,
            is_complete: record.is_complete,
            date_start: record.date_start,
            date_end: record.date_end,
            date_target: record.date_target,
            time_remain: record.time_remain,
            reset_switch: record.reset_switch,
            extras: record.extras,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }

    pub fn date_start(&self) -> Option<DateTime<Utc>> {
        self.date_start
    }

    pub fn date_end(&self) -> Option<DateTime<Utc>> {
        self.date_end
    }

    pub fn date_target(&self) -> Option<DateTime<Utc>> {
        self.date_target
    }

    pub fn reset_switch(&self) -> &[String] {
        &self.reset_switch
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub(crate) fn set_reset_switch(&mut self, titles: Vec<String>) {
        self.reset_switch = titles;
    }

    /// Start (or restart) the timer at `now`
    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.is_on = true;
        self.is_complete = false;
        self.has_run = true;
        self.date_start = Some(now);

        if let TimerKind::CountDown { minutes } = self.kind {
            self.date_target =
                Duration::try_minutes(minutes).and_then(|length| now.checked_add_signed(length));
            if self.date_target.is_none() {
                warn!("Count-down '{}' of {} minutes has no reachable deadline", self.id, minutes);
            }
        }
    }

    /// Stop the timer at `now`
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_on = false;
        self.is_complete = true;
        self.date_end = Some(now);
    }

    /// Seconds until the deadline, cached while running and frozen once complete
    pub fn remaining_seconds(&mut self, now: DateTime<Utc>) -> Option<i64> {
        if self.is_complete || !self.has_run {
            return self.time_remain;
        }
        if let Some(target) = self.date_target {
            self.time_remain = Some(floor_seconds(now, target));
        }
        self.time_remain
    }

    /// Full record; down-counting variants refresh `timeRemain` first
    pub fn snapshot(&mut self, now: DateTime<Utc>) -> TimerRecord {
        if self.kind.direction() == Direction::Down {
            self.remaining_seconds(now);
        }
        self.record()
    }

    fn record(&self) -> TimerRecord {
        TimerRecord {
            date_end: self.date_end,
            date_start: self.date_start,
            date_target: self.date_target,
            extras: self.extras.clone(),
            has_run: self.has_run,
            id: self.id.clone(),
            is_complete: self.is_complete,
            is_on: self.is_on,
            reset_switch: self.reset_switch.clone(),
            time_remain: self.time_remain,
            time_target: match self.kind {
                TimerKind::CountDown { minutes } => Some(minutes),
                _ => None,
            },
            title: self.title.clone(),
            timer_type: self.kind.timer_type(),
        }
    }

    /// Fresh whole-second reading for telemetry, never cached
    pub fn live_detail(&self, now: DateTime<Utc>) -> LiveDetail {
        let whole_seconds = match self.kind {
            TimerKind::CountUp => self.date_start.map(|start| floor_seconds(start, now)),
            TimerKind::CountDown { .. } | TimerKind::AbsoluteDown => {
                self.date_target.map(|target| floor_seconds(now, target))
            }
        };

        LiveDetail {
            title: self.title.clone(),
            whole_seconds: whole_seconds.unwrap_or(0),
            direction: self.kind.direction(),
        }
    }
}

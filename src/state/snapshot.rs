//! Persisted snapshot of the whole show
//!
//! The same JSON object is written to disk after every change and read back
//! verbatim when resuming. Snapshots written before `sendToggle` and
//! `blinkExpired` existed still load, with both flags off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    show_state::{HttpConfig, OscConfig, ShowMeta, ShowState},
    slug::SlugAllocator,
    switch::Switch,
    timer::{Timer, TimerRecord},
};
use crate::{error::ConfigError, utils::time::{self, iso_opt}};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSnapshot {
    #[serde(default, with = "iso_opt")]
    pub date: Option<DateTime<Utc>>,
    pub subtitle: String,
    pub title: String,
    pub switches: Vec<Switch>,
    pub timers: Vec<TimerRecord>,
    pub http: HttpConfig,
    pub osc: OscConfig,
}

impl ShowSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ShowState {
    /// Full persisted representation, refreshing running timers first
    pub fn snapshot(&mut self) -> ShowSnapshot {
        let now = time::now();
        ShowSnapshot {
            date: self.meta.date,
            subtitle: self.meta.subtitle.clone(),
            title: self.meta.title.clone(),
            switches: self.switches.clone(),
            timers: self.timers.iter_mut().map(|t| t.snapshot(now)).collect(),
            http: self.http.clone(),
            osc: self.osc.clone(),
        }
    }

    /// Resume a show from a snapshot, keeping every recorded flag and timestamp
    pub fn from_snapshot(snapshot: ShowSnapshot) -> Result<Self, ConfigError> {
        let mut ids = SlugAllocator::new();
        for switch in &snapshot.switches {
            ids.reserve(switch.id());
        }

        let timers = snapshot
            .timers
            .into_iter()
            .map(|record| {
                ids.reserve(&record.id);
                Timer::rehydrate(record)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Resumed show '{}' with {} switches and {} timers",
            snapshot.title,
            snapshot.switches.len(),
            timers.len()
        );

        Ok(ShowState {
            meta: ShowMeta {
                title: snapshot.title,
                subtitle: snapshot.subtitle,
                date: snapshot.date,
            },
            osc: snapshot.osc,
            http: snapshot.http,
            switches: snapshot.switches,
            timers,
            ids,
        })
    }
}

//! Show state: the ordered timers and switches plus show and network settings
//!
//! `ShowState` is the single owner of every timer and switch. Its mutators
//! never fail and never perform I/O; each one returns a [`Changes`] set that
//! the host uses to decide what to broadcast and persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    slug::SlugAllocator,
    switch::Switch,
    timer::{LiveDetail, Timer, TimerKind, TimerRecord},
};
use crate::utils::time::{self, iso_opt};

/// What a mutation touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub switches: bool,
    pub timers: bool,
}

impl Changes {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn switches() -> Self {
        Self { switches: true, timers: false }
    }

    pub fn timers() -> Self {
        Self { switches: false, timers: true }
    }

    pub fn is_empty(&self) -> bool {
        !self.switches && !self.timers
    }

    pub fn merge(self, other: Changes) -> Self {
        Self {
            switches: self.switches || other.switches,
            timers: self.timers || other.timers,
        }
    }
}

/// Show title, subtitle and nominal start instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowMeta {
    pub title: String,
    pub subtitle: String,
    pub date: Option<DateTime<Utc>>,
}

/// OSC endpoint and broadcast feature flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OscConfig {
    pub address: String,
    pub in_port: u16,
    pub out_port: u16,
    pub send_active_timer: bool,
    pub send_switch: bool,
    pub send_timer_status: bool,
    #[serde(default)]
    pub send_toggle: bool,
    #[serde(default)]
    pub blink_expired: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,
}

/// Serialized projection served over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowView {
    #[serde(with = "iso_opt")]
    pub date: Option<DateTime<Utc>>,
    pub subtitle: String,
    pub switches: Vec<Switch>,
    pub timers: Vec<TimerRecord>,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct ShowState {
    pub(super) meta: ShowMeta,
    pub(super) osc: OscConfig,
    pub(super) http: HttpConfig,
    pub(super) switches: Vec<Switch>,
    pub(super) timers: Vec<Timer>,
    pub(super) ids: SlugAllocator,
}

impl ShowState {
    pub fn builder(meta: ShowMeta, osc: OscConfig, http: HttpConfig) -> ShowBuilder {
        ShowBuilder {
            state: ShowState {
                meta,
                osc,
                http,
                switches: Vec::new(),
                timers: Vec::new(),
                ids: SlugAllocator::new(),
            },
        }
    }

    pub fn meta(&self) -> &ShowMeta {
        &self.meta
    }

    pub fn osc_config(&self) -> &OscConfig {
        &self.osc
    }

    pub fn http_config(&self) -> &HttpConfig {
        &self.http
    }

    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    /// Whether `id` has been handed out to a switch or timer
    pub fn is_id_taken(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /* Switch actions */

    pub fn switch_on(&mut self, index: usize) -> Changes {
        self.with_switch(index, Switch::on)
    }

    pub fn switch_off(&mut self, index: usize) -> Changes {
        self.with_switch(index, Switch::off)
    }

    pub fn switch_toggle(&mut self, index: usize) -> Changes {
        self.with_switch(index, Switch::toggle)
    }

    fn with_switch(&mut self, index: usize, action: impl FnOnce(&mut Switch)) -> Changes {
        match self.switches.get_mut(index) {
            Some(switch) => {
                action(switch);
                info!("Switch '{}' is now {}", switch.title(), switch.label());
                Changes::switches()
            }
            None => {
                debug!("Ignoring switch index {} (have {})", index, self.switches.len());
                Changes::none()
            }
        }
    }

    /* Timer actions */

    pub fn active_timer_index(&self) -> Option<usize> {
        self.timers.iter().position(Timer::is_on)
    }

    fn safe_on(&mut self, index: usize, now: DateTime<Utc>) {
        if let Some(timer) = self.timers.get_mut(index) {
            timer.activate(now);
        }
    }

    fn safe_off(&mut self, index: usize, now: DateTime<Utc>) {
        if let Some(timer) = self.timers.get_mut(index) {
            timer.deactivate(now);
        }
    }

    /// Move to the next timer, forcing off the new timer's reset switches
    pub fn advance(&mut self) -> Changes {
        let now = time::now();
        match self.active_timer_index() {
            None => self.safe_on(0, now),
            Some(current) => {
                self.safe_off(current, now);
                self.safe_on(current + 1, now);
            }
        }

        let mut changes = Changes::timers();
        if let Some(active) = self.active_timer_index() {
            let resets = self.timers[active].reset_switch();
            for switch in self.switches.iter_mut() {
                if resets.iter().any(|title| title == switch.title()) {
                    switch.off();
                    changes.switches = true;
                    debug!("Reset switch '{}'", switch.title());
                }
            }
        }

        self.log_active("next");
        changes
    }

    /// Move to the previous timer; no switch resets
    pub fn retreat(&mut self) -> Changes {
        let now = time::now();
        match self.active_timer_index() {
            None => {
                if let Some(last) = self.timers.len().checked_sub(1) {
                    self.safe_on(last, now);
                }
            }
            Some(current) => {
                self.safe_off(current, now);
                if let Some(previous) = current.checked_sub(1) {
                    self.safe_on(previous, now);
                }
            }
        }

        self.log_active("previous");
        Changes::timers()
    }

    pub fn stop_all(&mut self) -> Changes {
        if let Some(current) = self.active_timer_index() {
            self.safe_off(current, time::now());
        }
        self.log_active("stop");
        Changes::timers()
    }

    fn log_active(&self, action: &str) {
        match self.active_timer_index() {
            Some(i) => info!("Timer {}: '{}' is running", action, self.timers[i].title()),
            None => info!("Timer {}: no timer running", action),
        }
    }

    /* Projections */

    /// Metadata, every switch and every timer (admin view)
    pub fn render_full(&mut self) -> ShowView {
        self.render(|_| true)
    }

    /// Same as [`render_full`](Self::render_full) with only the running timer
    pub fn render_active_only(&mut self) -> ShowView {
        self.render(Timer::is_on)
    }

    fn render(&mut self, keep: impl Fn(&Timer) -> bool) -> ShowView {
        let now = time::now();
        ShowView {
            date: self.meta.date,
            subtitle: self.meta.subtitle.clone(),
            switches: self.switches.clone(),
            timers: self
                .timers
                .iter_mut()
                .filter(|t| keep(&**t))
                .map(|t| t.snapshot(now))
                .collect(),
            title: self.meta.title.clone(),
        }
    }

    pub fn render_active_telemetry(&self) -> Option<LiveDetail> {
        self.render_active_telemetry_at(time::now())
    }

    pub fn render_active_telemetry_at(&self, now: DateTime<Utc>) -> Option<LiveDetail> {
        self.active_timer_index()
            .map(|i| self.timers[i].live_detail(now))
    }
}

/// Builds a fresh show; consumed by [`ShowBuilder::build`]
#[derive(Debug)]
pub struct ShowBuilder {
    state: ShowState,
}

impl ShowBuilder {
    pub fn switch(
        &mut self,
        title: &str,
        on_text: Option<String>,
        off_text: Option<String>,
    ) -> &mut Self {
        let id = self.state.ids.allocate("switch", title);
        self.state
            .switches
            .push(Switch::new(id, title.to_string(), on_text, off_text, false));
        self
    }

    pub fn count_up(&mut self, title: &str, extras: Vec<String>) -> &mut Self {
        let id = self.state.ids.allocate("timer", title);
        self.state
            .timers
            .push(Timer::count_up(id, title.to_string(), extras));
        self
    }

    pub fn count_down(&mut self, title: &str, minutes: i64, extras: Vec<String>) -> &mut Self {
        let id = self.state.ids.allocate("timer", title);
        self.state
            .timers
            .push(Timer::count_down(id, title.to_string(), minutes, extras));
        self
    }

    /// Countdown to the show's start instant
    pub fn absolute_down(&mut self, title: &str, extras: Vec<String>) -> &mut Self {
        let id = self.state.ids.allocate("timer", title);
        let target = self.state.meta.date;
        self.state
            .timers
            .push(Timer::absolute_down(id, title.to_string(), target, extras));
        self
    }

    /// Set the reset-switch list of the most recently added timer
    pub fn reset_switches(&mut self, titles: Vec<String>) -> &mut Self {
        if let Some(timer) = self.state.timers.last_mut() {
            timer.set_reset_switch(titles);
        }
        self
    }

    /// Finish construction and start the opening timer
    ///
    /// The first absolute countdown starts itself. Without one, timer 0 is
    /// started so the show always opens with a running clock.
    pub fn build(self, now: DateTime<Utc>) -> ShowState {
        let mut state = self.state;

        let opening = state
            .timers
            .iter()
            .position(|t| t.kind() == TimerKind::AbsoluteDown)
            .or(if state.timers.is_empty() { None } else { Some(0) });

        if let Some(index) = opening {
            state.timers[index].activate(now);
        }

        info!(
            "Built show '{}' with {} switches and {} timers",
            state.meta.title,
            state.switches.len(),
            state.timers.len()
        );
        state
    }
}

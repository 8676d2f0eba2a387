//! Human-authored show document (TOML) used for a fresh start

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use super::show_state::{HttpConfig, OscConfig, ShowMeta, ShowState};
use super::timer::is_valid_count_minutes;
use crate::{
    error::ConfigError,
    utils::time::{self, minutes_opt},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDocument {
    pub title: String,
    pub subtitle: String,
    pub osc_send_address: String,
    pub osc_send_port: u16,
    pub osc_listen_port: u16,
    pub osc_send_active_timer: bool,
    pub osc_send_timer_status: bool,
    pub osc_send_switch: bool,
    #[serde(default)]
    pub osc_send_toggle: bool,
    #[serde(default)]
    pub osc_blink_expired: bool,
    pub http_port: u16,
    #[serde(default)]
    pub switches: Vec<SwitchEntry>,
    #[serde(default)]
    pub timers: Vec<TimerEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEntry {
    pub title: String,
    pub on_text: Option<String>,
    pub off_text: Option<String>,
}

/// A timer entry; the variant follows from which optional fields are set
#[derive(Debug, Clone, Deserialize)]
pub struct TimerEntry {
    pub title: String,
    #[serde(default)]
    pub start_countdown: bool,
    #[serde(default, deserialize_with = "minutes_opt::deserialize")]
    pub count_minutes: Option<i64>,
    #[serde(default)]
    pub extras: Vec<String>,
    pub reset_switches: Option<Vec<String>>,
}

impl ShowDocument {
    /// Parse and validate a show document
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let document: Self = toml::from_str(raw)?;

        for entry in &document.timers {
            match entry.count_minutes {
                Some(minutes) if !entry.start_countdown && !is_valid_count_minutes(minutes) => {
                    return Err(ConfigError::InvalidCountMinutes {
                        title: entry.title.clone(),
                        minutes,
                    });
                }
                _ => {}
            }
        }

        Ok(document)
    }

    /// Build the show, with absolute countdowns targeting `date`
    pub fn into_show(self, date: DateTime<Utc>) -> ShowState {
        let meta = ShowMeta {
            title: self.title,
            subtitle: self.subtitle,
            date: Some(date),
        };
        let osc = OscConfig {
            address: self.osc_send_address,
            in_port: self.osc_listen_port,
            out_port: self.osc_send_port,
            send_active_timer: self.osc_send_active_timer,
            send_switch: self.osc_send_switch,
            send_timer_status: self.osc_send_timer_status,
            send_toggle: self.osc_send_toggle,
            blink_expired: self.osc_blink_expired,
        };

        let mut builder = ShowState::builder(meta, osc, HttpConfig { port: self.http_port });

        for entry in self.switches {
            builder.switch(&entry.title, entry.on_text, entry.off_text);
        }

        for entry in self.timers {
            if entry.start_countdown {
                builder.absolute_down(&entry.title, entry.extras);
            } else if let Some(minutes) = entry.count_minutes {
                builder.count_down(&entry.title, minutes, entry.extras);
            } else {
                builder.count_up(&entry.title, entry.extras);
            }

            if let Some(titles) = entry.reset_switches {
                builder.reset_switches(titles);
            }
        }

        builder.build(time::now())
    }
}

/// Combine a `YYYY-MM-DD` (or `today`) date and a 24h time, read as local time
pub fn parse_show_date(date: &str, clock: &str) -> Result<DateTime<Utc>, ConfigError> {
    let day = if date.eq_ignore_ascii_case("today") {
        Local::now().date_naive()
    } else {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ConfigError::InvalidDate(date.to_string()))?
    };

    let at = NaiveTime::parse_from_str(clock, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
        .map_err(|_| ConfigError::InvalidTime(clock.to_string()))?;

    let local = day.and_time(at);
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .ok_or_else(|| ConfigError::NonexistentLocalTime(local.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SHOW: &str = r#"
title = "Our Town"
subtitle = "Opening Night"
oscSendAddress = "192.168.1.20"
oscSendPort = 53001
oscListenPort = 53000
oscSendActiveTimer = true
oscSendTimerStatus = true
oscSendSwitch = true
httpPort = 2222

[[switches]]
title = "Lobby"
onText = "OPEN"
offText = "CLOSED"

[[switches]]
title = "House"

[[timers]]
title = "Curtain"
start_countdown = true

[[timers]]
title = "Preshow"
extras = ["Sound check"]

[[timers]]
title = "Act1"
count_minutes = 10
reset_switches = ["Lobby"]
"#;

    fn show_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap()
    }

    #[test]
    fn builds_show_from_document() {
        let state = ShowDocument::from_toml(SHOW).unwrap().into_show(show_date());

        assert_eq!(state.meta().title, "Our Town");
        assert_eq!(state.osc_config().in_port, 53000);
        assert_eq!(state.osc_config().out_port, 53001);
        assert!(!state.osc_config().send_toggle);
        assert_eq!(state.http_config().port, 2222);

        assert_eq!(state.switches()[1].on_text(), "ON");
        assert_eq!(state.timers()[0].date_target(), Some(show_date()));
        assert_eq!(state.timers()[1].extras(), ["Sound check".to_string()]);
        assert_eq!(state.timers()[2].reset_switch(), ["Lobby".to_string()]);
        assert_eq!(state.active_timer_index(), Some(0));
    }

    #[test]
    fn missing_required_key_is_fatal() {
        let broken = SHOW.replace("httpPort = 2222", "");
        assert!(matches!(ShowDocument::from_toml(&broken), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn wrong_type_is_fatal() {
        let broken = SHOW.replace("oscSendPort = 53001", "oscSendPort = \"loud\"");
        assert!(ShowDocument::from_toml(&broken).is_err());
    }

    #[test]
    fn parses_date_and_time() {
        let date = parse_show_date("2024-05-01", "19:30").unwrap();
        let local = date.with_timezone(&Local);
        assert_eq!((local.hour(), local.minute()), (19, 30));

        assert!(parse_show_date("today", "07:05:30").is_ok());
        assert!(matches!(parse_show_date("May 1", "19:30"), Err(ConfigError::InvalidDate(_))));
        assert!(matches!(parse_show_date("2024-05-01", "7pm"), Err(ConfigError::InvalidTime(_))));
    }

    #[test]
    fn oversized_count_minutes_fail_at_load() {
        let broken = SHOW.replace("count_minutes = 10", "count_minutes = 999999999999");
        assert!(matches!(
            ShowDocument::from_toml(&broken),
            Err(ConfigError::InvalidCountMinutes { minutes: 999_999_999_999, .. })
        ));

        for bad in ["0", "-5", "0.5", "nan"] {
            let broken = SHOW.replace("count_minutes = 10", &format!("count_minutes = {}", bad));
            assert!(
                matches!(
                    ShowDocument::from_toml(&broken),
                    Err(ConfigError::InvalidCountMinutes { .. })
                ),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn fractional_count_minutes_are_truncated() {
        let show = SHOW.replace("count_minutes = 10", "count_minutes = 2.5");
        let mut state = ShowDocument::from_toml(&show).unwrap().into_show(show_date());
        assert_eq!(state.timers()[2].kind(), crate::state::TimerKind::CountDown { minutes: 2 });

        state.advance();
        state.advance();
        assert_eq!(state.active_timer_index(), Some(2));
        assert!(state.timers()[2].date_target().is_some());
    }
}

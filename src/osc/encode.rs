//! Outbound OSC messages: status bundles and active-timer telemetry

use std::time::{Duration, SystemTime};

use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

use super::NAMESPACE;
use crate::{
    error::WireError,
    state::{LiveDetail, Switch, Timer},
};

/// How far ahead of "now" status bundles are timetagged
pub const BUNDLE_LEAD: Duration = Duration::from_millis(50);

/// Timetag for a bundle sent right now
pub fn bundle_timetag() -> Result<OscTime, WireError> {
    OscTime::try_from(SystemTime::now() + BUNDLE_LEAD)
        .map_err(|e| WireError::Timetag(format!("{:?}", e)))
}

/// `/theaterTime/{family}/NN` with a 1-based, zero-padded index
fn indexed_address(family: &str, index: usize) -> String {
    format!("/{}/{}/{:02}", NAMESPACE, family, index + 1)
}

fn flag(on: bool) -> OscType {
    OscType::Int(i32::from(on))
}

fn bundle(timetag: OscTime, messages: Vec<OscMessage>) -> OscPacket {
    OscPacket::Bundle(OscBundle {
        timetag,
        content: messages.into_iter().map(OscPacket::Message).collect(),
    })
}

/// One `[title, label, 0|1]` message per switch
pub fn switch_status_bundle(switches: &[Switch], timetag: OscTime) -> OscPacket {
    let messages = switches
        .iter()
        .enumerate()
        .map(|(i, switch)| OscMessage {
            addr: indexed_address("switch", i),
            args: vec![
                OscType::String(switch.title().to_string()),
                OscType::String(switch.label().to_string()),
                flag(switch.is_on()),
            ],
        })
        .collect();
    bundle(timetag, messages)
}

/// One `[onText | " ", offText | " "]` message per switch, for two-lamp displays
pub fn switch_toggle_bundle(switches: &[Switch], timetag: OscTime) -> OscPacket {
    let messages = switches
        .iter()
        .enumerate()
        .map(|(i, switch)| {
            let (on, off) = if switch.is_on() {
                (switch.on_text(), " ")
            } else {
                (" ", switch.off_text())
            };
            OscMessage {
                addr: indexed_address("toggle", i),
                args: vec![OscType::String(on.to_string()), OscType::String(off.to_string())],
            }
        })
        .collect();
    bundle(timetag, messages)
}

/// One `[title, 0|1]` message per timer
pub fn timer_status_bundle(timers: &[Timer], timetag: OscTime) -> OscPacket {
    let messages = timers
        .iter()
        .enumerate()
        .map(|(i, timer)| OscMessage {
            addr: indexed_address("timer", i),
            args: vec![OscType::String(timer.title().to_string()), flag(timer.is_on())],
        })
        .collect();
    bundle(timetag, messages)
}

/// Overrun seconds blank out on odd values, giving a 1s on / 1s off flash
pub fn should_blink(whole_seconds: i64) -> bool {
    whole_seconds < 0 && whole_seconds.rem_euclid(2) == 1
}

/// `[wholeSeconds, title, formatted, glyph]` for the running timer
pub fn telemetry_message(detail: &LiveDetail, blink_expired: bool) -> OscPacket {
    let seconds = OscType::Int(
        detail
            .whole_seconds
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
    );

    let args = if blink_expired && should_blink(detail.whole_seconds) {
        vec![
            seconds,
            OscType::String(" ".into()),
            OscType::String(" ".into()),
            OscType::String(" ".into()),
        ]
    } else {
        vec![
            seconds,
            OscType::String(detail.title.clone()),
            OscType::String(format_time(detail.whole_seconds)),
            OscType::String(detail.direction.glyph().into()),
        ]
    };

    OscPacket::Message(OscMessage {
        addr: format!("/{}/currentTimer", NAMESPACE),
        args,
    })
}

/// `MM:SS` under an hour, `H:MM:SS` above, prefixed with `+ ` on overrun
pub fn format_time(seconds: i64) -> String {
    let sign = if seconds < 0 { "+ " } else { "" };
    let total = seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours == 0 {
        format!("{}{:02}:{:02}", sign, minutes, secs)
    } else {
        format!("{}{}:{:02}:{:02}", sign, hours, minutes, secs)
    }
}

pub fn encode(packet: &OscPacket) -> Result<Vec<u8>, WireError> {
    rosc::encoder::encode(packet).map_err(|e| WireError::Encode(format!("{:?}", e)))
}

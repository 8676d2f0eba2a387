//! Maps decoded control commands onto show state mutators

use tracing::{debug, error, info, warn};

use super::decode::{decode_messages, parse_command, Command, SwitchAction, TimerAction};
use crate::{
    error::WireError,
    state::{AppState, Changes, ShowState},
};

pub fn dispatch(show: &mut ShowState, command: Command) -> Changes {
    match command {
        Command::Switch { index, action } => match action {
            SwitchAction::On => show.switch_on(index),
            SwitchAction::Off => show.switch_off(index),
            SwitchAction::Toggle => show.switch_toggle(index),
        },
        Command::Timer(TimerAction::Next) => show.advance(),
        Command::Timer(TimerAction::Previous) => show.retreat(),
        Command::Timer(TimerAction::Stop) => show.stop_all(),
    }
}

/// Decode one datagram and apply every command it carries
///
/// Only a datagram that cannot be decoded at all is an error. Messages that
/// fail to parse are logged and skipped.
pub fn handle_datagram(state: &AppState, buf: &[u8]) -> Result<Changes, WireError> {
    let mut changes = Changes::none();

    for message in decode_messages(buf)? {
        let command = match parse_command(&message.addr) {
            Ok(Some(command)) => command,
            Ok(None) => {
                debug!("Ignoring OSC address {}", message.addr);
                continue;
            }
            Err(e) => {
                warn!("Dropping OSC message {}: {}", message.addr, e);
                continue;
            }
        };

        info!("Acting on OSC: {}", message.addr);
        match state.apply(&message.addr, |show| dispatch(show, command)) {
            Ok(applied) => changes = changes.merge(applied),
            Err(e) => error!("Failed to apply {}: {}", message.addr, e),
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::show_state::tests::{meta, osc, scenario};
    use crate::state::HttpConfig;
    use crate::utils::time;
    use rosc::{OscBundle, OscMessage, OscPacket, OscTime};
    use std::path::PathBuf;

    fn datagram(addrs: &[&str]) -> Vec<u8> {
        let content = addrs
            .iter()
            .map(|a| OscPacket::Message(OscMessage { addr: a.to_string(), args: vec![] }))
            .collect();
        rosc::encoder::encode(&OscPacket::Bundle(OscBundle {
            timetag: OscTime { seconds: 0, fractional: 1 },
            content,
        }))
        .unwrap()
    }

    fn with_three_switches() -> AppState {
        let mut builder = ShowState::builder(meta(), osc(), HttpConfig { port: 2222 });
        builder
            .switch("Lobby", None, None)
            .switch("House", None, None)
            .switch("Stage", None, None)
            .count_up("Preshow", vec![])
            .count_up("Act1", vec![]);
        AppState::new(builder.build(time::now()), PathBuf::from("unused.json"))
    }

    #[test]
    fn toggle_hits_only_the_addressed_switch() {
        let state = with_three_switches();
        let changes = handle_datagram(&state, &datagram(&["/theaterTime/switch/02/toggle"])).unwrap();

        assert_eq!(changes, Changes::switches());
        let on: Vec<bool> = state
            .read(|show| show.switches().iter().map(|s| s.is_on()).collect())
            .unwrap();
        assert_eq!(on, [false, true, false]);
    }

    #[test]
    fn unknown_namespace_changes_nothing() {
        let state = with_three_switches();
        let mut rx = state.change_tx.subscribe();
        let before = state.snapshot().unwrap();

        let changes = handle_datagram(&state, &datagram(&["/lights/switch/01/on"])).unwrap();

        assert!(changes.is_empty());
        assert!(rx.try_recv().is_err());
        assert_eq!(state.snapshot().unwrap().switches, before.switches);
    }

    #[test]
    fn bad_index_is_skipped_but_rest_applies() {
        let state = with_three_switches();
        let changes = handle_datagram(
            &state,
            &datagram(&["/theaterTime/switch/xx/on", "/theaterTime/timer/stop"]),
        )
        .unwrap();

        assert_eq!(changes, Changes::timers());
        assert_eq!(state.read(|show| show.active_timer_index()).unwrap(), None);
    }

    #[test]
    fn timer_commands_dispatch() {
        let mut show = scenario();
        dispatch(&mut show, Command::Timer(TimerAction::Next));
        assert_eq!(show.active_timer_index(), Some(1));
        dispatch(&mut show, Command::Timer(TimerAction::Previous));
        assert_eq!(show.active_timer_index(), Some(0));
        dispatch(&mut show, Command::Timer(TimerAction::Stop));
        assert_eq!(show.active_timer_index(), None);
    }

    #[test]
    fn undecodable_datagram_is_an_error() {
        let state = with_three_switches();
        assert!(handle_datagram(&state, &[0xff, 0x00, 0x01]).is_err());
    }
}

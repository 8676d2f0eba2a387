//! Inbound OSC: datagram decoding and address parsing

use rosc::{OscMessage, OscPacket};

use super::NAMESPACE;
use crate::error::WireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    On,
    Off,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Next,
    Previous,
    Stop,
}

/// A control command addressed to the show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `index` is 0-based
    Switch { index: usize, action: SwitchAction },
    Timer(TimerAction),
}

/// Decode a datagram into its messages, flattening bundles in order
pub fn decode_messages(buf: &[u8]) -> Result<Vec<OscMessage>, WireError> {
    let (_, packet) =
        rosc::decoder::decode_udp(buf).map_err(|e| WireError::Decode(format!("{:?}", e)))?;

    let mut out = Vec::new();
    flatten(packet, &mut out);
    Ok(out)
}

fn flatten(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(message) => out.push(message),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                flatten(inner, out);
            }
        }
    }
}

/// Parse an address into a command
///
/// Returns `Ok(None)` for foreign namespaces and for unrecognized verbs.
/// A switch index that is not a number is an error.
pub fn parse_command(addr: &str) -> Result<Option<Command>, WireError> {
    let parts: Vec<&str> = addr.strip_prefix('/').unwrap_or(addr).split('/').collect();

    let Some((&namespace, rest)) = parts.split_first() else {
        return Ok(None);
    };
    if namespace != NAMESPACE {
        return Ok(None);
    }

    match rest {
        ["switch", number, verb, ..] => {
            let number: usize = number
                .parse()
                .map_err(|_| WireError::BadIndex(number.to_string()))?;
            let action = match *verb {
                "on" => SwitchAction::On,
                "off" => SwitchAction::Off,
                "toggle" => SwitchAction::Toggle,
                _ => return Ok(None),
            };
            Ok(number
                .checked_sub(1)
                .map(|index| Command::Switch { index, action }))
        }
        ["timer", verb, ..] => Ok(match *verb {
            "next" => Some(Command::Timer(TimerAction::Next)),
            "previous" => Some(Command::Timer(TimerAction::Previous)),
            "stop" => Some(Command::Timer(TimerAction::Stop)),
            _ => None,
        }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::{OscBundle, OscTime, OscType};

    fn encode(packet: &OscPacket) -> Vec<u8> {
        rosc::encoder::encode(packet).unwrap()
    }

    fn message(addr: &str) -> OscPacket {
        OscPacket::Message(OscMessage { addr: addr.into(), args: vec![] })
    }

    #[test]
    fn parses_switch_commands() {
        assert_eq!(
            parse_command("/theaterTime/switch/02/toggle").unwrap(),
            Some(Command::Switch { index: 1, action: SwitchAction::Toggle })
        );
        assert_eq!(
            parse_command("/theaterTime/switch/1/on").unwrap(),
            Some(Command::Switch { index: 0, action: SwitchAction::On })
        );
        assert_eq!(parse_command("/theaterTime/switch/0/off").unwrap(), None);
    }

    #[test]
    fn parses_timer_commands() {
        assert_eq!(
            parse_command("/theaterTime/timer/next").unwrap(),
            Some(Command::Timer(TimerAction::Next))
        );
        assert_eq!(
            parse_command("/theaterTime/timer/previous").unwrap(),
            Some(Command::Timer(TimerAction::Previous))
        );
        assert_eq!(
            parse_command("/theaterTime/timer/stop").unwrap(),
            Some(Command::Timer(TimerAction::Stop))
        );
        assert_eq!(parse_command("/theaterTime/timer/rewind").unwrap(), None);
    }

    #[test]
    fn ignores_foreign_namespace() {
        assert_eq!(parse_command("/otherApp/timer/next").unwrap(), None);
        assert_eq!(parse_command("/").unwrap(), None);
        assert_eq!(parse_command("/theaterTime").unwrap(), None);
    }

    #[test]
    fn rejects_non_numeric_index() {
        assert!(matches!(
            parse_command("/theaterTime/switch/two/on"),
            Err(WireError::BadIndex(_))
        ));
    }

    #[test]
    fn decodes_single_message() {
        let packet = OscPacket::Message(OscMessage {
            addr: "/theaterTime/timer/next".into(),
            args: vec![OscType::Int(1)],
        });
        let msgs = decode_messages(&encode(&packet)).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].addr, "/theaterTime/timer/next");
    }

    #[test]
    fn flattens_nested_bundles_in_order() {
        let tag = OscTime { seconds: 0, fractional: 1 };
        let packet = OscPacket::Bundle(OscBundle {
            timetag: tag,
            content: vec![
                message("/a"),
                OscPacket::Bundle(OscBundle {
                    timetag: tag,
                    content: vec![message("/b"), message("/c")],
                }),
            ],
        });
        let addrs: Vec<String> = decode_messages(&encode(&packet))
            .unwrap()
            .into_iter()
            .map(|m| m.addr)
            .collect();
        assert_eq!(addrs, ["/a", "/b", "/c"]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_messages(b"not osc at all"),
            Err(WireError::Decode(_))
        ));
    }
}

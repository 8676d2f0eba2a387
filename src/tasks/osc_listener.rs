//! Inbound OSC listener task

use std::{sync::Arc, time::Duration};
use tokio::{net::UdpSocket, time::sleep};
use tracing::{debug, error, info, warn};

use crate::{osc::handle_datagram, state::AppState};

const RETRY_BASE: Duration = Duration::from_millis(50);
const RETRY_MAX: Duration = Duration::from_secs(2);

/// Pause after `failures` consecutive receive errors, doubling up to a cap
fn retry_delay(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(16);
    RETRY_BASE.saturating_mul(factor).min(RETRY_MAX)
}

/// Receive control datagrams forever, applying each one to the show
///
/// Bad packets are logged and dropped; the loop never exits on them.
pub async fn osc_listener_task(state: Arc<AppState>, socket: UdpSocket) {
    match socket.local_addr() {
        Ok(addr) => info!("Listening to OSC on {}", addr),
        Err(e) => warn!("OSC listener has no local address: {}", e),
    }

    let mut buf = vec![0u8; 65_536];
    let mut failures = 0u32;
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => {
                failures = 0;
                received
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                let delay = retry_delay(failures);
                error!("OSC listener error ({} in a row), retrying in {:?}: {}", failures, delay, e);
                sleep(delay).await;
                continue;
            }
        };

        match handle_datagram(&state, &buf[..len]) {
            Ok(changes) => debug!("OSC packet from {} produced {:?}", peer, changes),
            Err(e) => warn!("OSC packet problem from {}: {}", peer, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::show_state::tests::scenario;
    use rosc::{OscMessage, OscPacket};
    use std::path::PathBuf;

    #[test]
    fn receive_errors_back_off() {
        assert_eq!(retry_delay(1), Duration::from_millis(50));
        assert_eq!(retry_delay(2), Duration::from_millis(100));
        assert_eq!(retry_delay(4), Duration::from_millis(400));
        assert_eq!(retry_delay(7), RETRY_MAX);
        assert_eq!(retry_delay(u32::MAX), RETRY_MAX);
    }

    #[tokio::test]
    async fn applies_inbound_commands() {
        let state = Arc::new(AppState::new(scenario(), PathBuf::from("unused.json")));
        let mut rx = state.change_tx.subscribe();

        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let listener = tokio::spawn(osc_listener_task(Arc::clone(&state), socket));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(b"garbage", addr).await.unwrap();
        let packet = rosc::encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/theaterTime/timer/next".into(),
            args: vec![],
        }))
        .unwrap();
        client.send_to(&packet, addr).await.unwrap();

        let changes = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(changes.timers);
        assert_eq!(state.read(|show| show.active_timer_index()).unwrap(), Some(1));

        listener.abort();
    }
}

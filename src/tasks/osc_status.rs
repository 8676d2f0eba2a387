//! Outbound status bundles, sent whenever switches or timers change

use std::sync::Arc;
use rosc::OscPacket;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::{
    osc::encode::{bundle_timetag, switch_status_bundle, switch_toggle_bundle, timer_status_bundle},
    services::OscSender,
    state::{AppState, Changes, OscConfig, ShowState},
};

/// Status bundles for everything in `changes` that `osc` has enabled
pub fn status_packets(show: &ShowState, osc: &OscConfig, changes: Changes) -> Result<Vec<OscPacket>, String> {
    let timetag = bundle_timetag().map_err(|e| e.to_string())?;
    let mut packets = Vec::new();

    if changes.switches && osc.send_switch {
        packets.push(switch_status_bundle(show.switches(), timetag));
    }
    if changes.switches && osc.send_toggle {
        packets.push(switch_toggle_bundle(show.switches(), timetag));
    }
    if changes.timers && osc.send_timer_status {
        packets.push(timer_status_bundle(show.timers(), timetag));
    }
    Ok(packets)
}

async fn send_status(state: &AppState, sender: &OscSender, changes: Changes) {
    let packets = match state
        .read(|show| status_packets(show, &state.osc, changes))
        .and_then(|packets| packets)
    {
        Ok(packets) => packets,
        Err(e) => {
            error!("Failed to build OSC status: {}", e);
            return;
        }
    };

    for packet in &packets {
        if let Err(e) = sender.send(packet).await {
            error!("{}", e);
        }
    }
    debug!("Sent {} OSC status bundles for {:?}", packets.len(), changes);
}

/// Background task that mirrors show changes onto the OSC bus
pub async fn osc_status_task(state: Arc<AppState>, sender: Arc<OscSender>) {
    info!("Starting OSC status task");

    let mut change_rx = state.change_tx.subscribe();
    let everything = Changes { switches: true, timers: true };

    // Displays start out in sync with the show
    send_status(&state, &sender, everything).await;

    loop {
        match change_rx.recv().await {
            Ok(changes) => send_status(&state, &sender, changes).await,
            Err(RecvError::Lagged(skipped)) => {
                warn!("OSC status task lagged by {} changes, resending all", skipped);
                send_status(&state, &sender, everything).await;
            }
            Err(RecvError::Closed) => {
                info!("Change channel closed, stopping OSC status task");
                break;
            }
        }
    }
}

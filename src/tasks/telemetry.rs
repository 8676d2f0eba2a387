//! Periodic active-timer telemetry

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::{osc::encode::telemetry_message, services::OscSender, state::AppState};

pub const TELEMETRY_PERIOD: Duration = Duration::from_millis(500);

/// Send the running timer's reading every [`TELEMETRY_PERIOD`]
///
/// Nothing is sent while no timer is running.
pub async fn telemetry_task(state: Arc<AppState>, sender: Arc<OscSender>) {
    info!("Starting telemetry task every {:?}", TELEMETRY_PERIOD);

    let mut ticker = interval(TELEMETRY_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let detail = match state.active_telemetry() {
            Ok(Some(detail)) => detail,
            Ok(None) => continue,
            Err(e) => {
                error!("Failed to read active timer: {}", e);
                continue;
            }
        };

        let packet = telemetry_message(&detail, state.osc.blink_expired);
        if let Err(e) = sender.send(&packet).await {
            error!("{}", e);
        }
    }
}

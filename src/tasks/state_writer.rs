//! Snapshot persistence task

use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast::error::RecvError, time::sleep};
use tracing::{error, info, warn};

use crate::{services::write_snapshot, state::AppState};

/// Delay before the first snapshot after startup
pub const INITIAL_SAVE_DELAY: Duration = Duration::from_millis(2500);

async fn save(state: &AppState) {
    match state.snapshot() {
        Ok(snapshot) => {
            if let Err(e) = write_snapshot(&state.state_file, &snapshot).await {
                error!("{}", e);
            }
        }
        Err(e) => error!("Failed to snapshot show: {}", e),
    }
}

/// Write the full snapshot once after startup, then after every change
pub async fn state_writer_task(state: Arc<AppState>) {
    info!("Saving state to {}", state.state_file.display());

    // Subscribe before the delay so early changes are not missed
    let mut change_rx = state.change_tx.subscribe();

    sleep(INITIAL_SAVE_DELAY).await;
    save(&state).await;

    loop {
        match change_rx.recv().await {
            Ok(_) => save(&state).await,
            Err(RecvError::Lagged(skipped)) => {
                warn!("State writer lagged by {} changes", skipped);
                save(&state).await;
            }
            Err(RecvError::Closed) => {
                info!("Change channel closed, stopping state writer");
                break;
            }
        }
    }
}

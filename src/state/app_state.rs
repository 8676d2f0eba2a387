//! Main application state management

use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{Changes, LiveDetail, OscConfig, ShowSnapshot, ShowState, ShowView};

/// Shared handle around the single show state
///
/// Every mutation goes through [`AppState::apply`], which holds the lock for
/// the whole call and then publishes the resulting [`Changes`] to the
/// background tasks (status broadcast, state writer).
#[derive(Debug)]
pub struct AppState {
    show: Mutex<ShowState>,
    /// OSC settings, fixed for the life of the process
    pub osc: OscConfig,
    /// Where snapshots are written
    pub state_file: PathBuf,
    /// Server metadata
    pub start_time: Instant,
    /// Channel for show change notifications
    pub change_tx: broadcast::Sender<Changes>,
}

impl AppState {
    pub fn new(show: ShowState, state_file: PathBuf) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            osc: show.osc_config().clone(),
            show: Mutex::new(show),
            state_file,
            start_time: Instant::now(),
            change_tx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ShowState>, String> {
        self.show
            .lock()
            .map_err(|e| format!("Failed to lock show state: {}", e))
    }

    /// Run a mutator and notify listeners of anything it changed
    pub fn apply<F>(&self, action: &str, mutator: F) -> Result<Changes, String>
    where
        F: FnOnce(&mut ShowState) -> Changes,
    {
        let changes = {
            let mut show = self.lock()?;
            mutator(&mut show)
        };

        if changes.is_empty() {
            debug!("Action '{}' changed nothing", action);
            return Ok(changes);
        }

        debug!("Action '{}' produced {:?}", action, changes);
        self.notify(changes);
        Ok(changes)
    }

    /// Publish a change set; having no subscribers is not an error
    pub fn notify(&self, changes: Changes) {
        if let Err(e) = self.change_tx.send(changes) {
            warn!("No listeners for change notification: {}", e);
        }
    }

    /// Run a read-only closure against the show
    pub fn read<T>(&self, reader: impl FnOnce(&ShowState) -> T) -> Result<T, String> {
        let show = self.lock()?;
        Ok(reader(&show))
    }

    pub fn render_full(&self) -> Result<ShowView, String> {
        Ok(self.lock()?.render_full())
    }

    pub fn render_active_only(&self) -> Result<ShowView, String> {
        Ok(self.lock()?.render_active_only())
    }

    pub fn active_telemetry(&self) -> Result<Option<LiveDetail>, String> {
        Ok(self.lock()?.render_active_telemetry())
    }

    pub fn snapshot(&self) -> Result<ShowSnapshot, String> {
        Ok(self.lock()?.snapshot())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

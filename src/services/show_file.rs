//! Loading the show at startup and writing snapshots while it runs

use std::path::Path;

use tracing::{debug, info};

use crate::{
    config::ShowSource,
    error::ConfigError,
    state::{parse_show_date, ShowDocument, ShowSnapshot, ShowState},
};

async fn read(path: &Path) -> Result<String, ConfigError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Build the show from a fresh document or resume it from a snapshot
pub async fn load_show(source: &ShowSource) -> Result<ShowState, ConfigError> {
    match source {
        ShowSource::Fresh { file, date, time } => {
            let start = parse_show_date(date, time)?;
            info!("Loading show from {} starting at {}", file.display(), start);
            let document = ShowDocument::from_toml(&read(file).await?)?;
            Ok(document.into_show(start))
        }
        ShowSource::Resume(file) => {
            info!("Resuming show from {}", file.display());
            let snapshot = ShowSnapshot::from_json(&read(file).await?)?;
            ShowState::from_snapshot(snapshot)
        }
    }
}

/// Rewrite the snapshot file wholesale
pub async fn write_snapshot(path: &Path, snapshot: &ShowSnapshot) -> Result<(), String> {
    let json = snapshot
        .to_json()
        .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    debug!("Saved state to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::show_state::tests::scenario;

    const SHOW: &str = r#"
title = "Test"
subtitle = "Matinee"
oscSendAddress = "127.0.0.1"
oscSendPort = 9001
oscListenPort = 9000
oscSendActiveTimer = false
oscSendTimerStatus = true
oscSendSwitch = true
oscSendToggle = true
httpPort = 8080

[[timers]]
title = "Preshow"
"#;

    #[tokio::test]
    async fn snapshot_file_resumes_show() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-state.json");

        let mut show = scenario();
        show.advance();
        write_snapshot(&path, &show.snapshot()).await.unwrap();

        let resumed = load_show(&ShowSource::Resume(path)).await.unwrap();
        assert_eq!(resumed.timers(), show.timers());
        assert_eq!(resumed.switches(), show.switches());
        assert_eq!(resumed.osc_config(), show.osc_config());
    }

    #[tokio::test]
    async fn fresh_document_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.toml");
        std::fs::write(&path, SHOW).unwrap();

        let show = load_show(&ShowSource::Fresh {
            file: path,
            date: "2024-05-01".into(),
            time: "14:00".into(),
        })
        .await
        .unwrap();

        assert_eq!(show.meta().subtitle, "Matinee");
        assert!(show.osc_config().send_toggle);
        assert_eq!(show.active_timer_index(), Some(0));
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_show(&ShowSource::Resume(dir.path().join("nope.json"))).await;
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}

//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "theater-time")]
#[command(about = "Show timers and switches over HTTP and OSC")]
#[command(version)]
pub struct Config {
    /// Show document (.toml) for a fresh start, or a saved state (.json) to resume
    pub show_file: Option<PathBuf>,

    /// Show date as YYYY-MM-DD, or "today"
    #[arg(requires = "time")]
    pub date: Option<String>,

    /// Show start time, 24h HH:MM
    pub time: Option<String>,

    /// Where the running state is saved and resumed from
    #[arg(long, default_value = "current-state.json")]
    pub state_file: PathBuf,

    /// Directory of static display pages
    #[arg(long, default_value = "public_html")]
    pub static_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the show comes from at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowSource {
    Fresh {
        file: PathBuf,
        date: String,
        time: String,
    },
    Resume(PathBuf),
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Decide between a fresh start and a resume
    pub fn source(&self) -> Result<ShowSource, ConfigError> {
        let Some(file) = &self.show_file else {
            if self.state_file.exists() {
                return Ok(ShowSource::Resume(self.state_file.clone()));
            }
            return Err(ConfigError::SavedStateNotFound(self.state_file.clone()));
        };

        match file.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ShowSource::Resume(file.clone())),
            Some("toml") => match (&self.date, &self.time) {
                (Some(date), Some(time)) => Ok(ShowSource::Fresh {
                    file: file.clone(),
                    date: date.clone(),
                    time: time.clone(),
                }),
                _ => Err(ConfigError::MissingShowStart),
            },
            _ => Err(ConfigError::UnknownSource(file.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("theater-time").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn toml_with_date_and_time_is_fresh() {
        let c = config(&["show.toml", "today", "19:30"]);
        assert_eq!(
            c.source().unwrap(),
            ShowSource::Fresh {
                file: "show.toml".into(),
                date: "today".into(),
                time: "19:30".into(),
            }
        );
    }

    #[test]
    fn json_file_resumes() {
        let c = config(&["backup.json"]);
        assert_eq!(c.source().unwrap(), ShowSource::Resume("backup.json".into()));
    }

    #[test]
    fn no_args_resumes_from_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("current-state.json");
        let state_arg = state.to_str().unwrap();

        let missing = config(&["--state-file", state_arg]);
        assert!(matches!(missing.source(), Err(ConfigError::SavedStateNotFound(_))));

        std::fs::write(&state, "{}").unwrap();
        let present = config(&["--state-file", state_arg]);
        assert_eq!(present.source().unwrap(), ShowSource::Resume(state.clone()));
    }

    #[test]
    fn toml_without_time_is_rejected() {
        let c = config(&["show.toml"]);
        assert!(c.source().is_err());
        assert!(Config::try_parse_from(["theater-time", "show.toml", "today"]).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let c = config(&["show.yaml"]);
        assert!(matches!(c.source(), Err(ConfigError::UnknownSource(_))));
    }
}

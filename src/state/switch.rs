//! Switch structure - a named boolean toggle with display labels

use serde::{Deserialize, Serialize};

fn default_on_text() -> String {
    "ON".to_string()
}

fn default_off_text() -> String {
    "OFF".to_string()
}

/// A show switch, serialized as `{id, title, onText, offText, isOn}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    id: String,
    title: String,
    #[serde(default = "default_on_text")]
    on_text: String,
    #[serde(default = "default_off_text")]
    off_text: String,
    #[serde(default)]
    is_on: bool,
}

impl Switch {
    /// Create a switch, falling back to "ON"/"OFF" for missing labels
    pub fn new(
        id: String,
        title: String,
        on_text: Option<String>,
        off_text: Option<String>,
        is_on: bool,
    ) -> Self {
        Self {
            id,
            title,
            on_text: on_text.unwrap_or_else(default_on_text),
            off_text: off_text.unwrap_or_else(default_off_text),
            is_on,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn on_text(&self) -> &str {
        &self.on_text
    }

    pub fn off_text(&self) -> &str {
        &self.off_text
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// The label matching the current state
    pub fn label(&self) -> &str {
        if self.is_on {
            &self.on_text
        } else {
            &self.off_text
        }
    }

    pub(crate) fn on(&mut self) {
        self.is_on = true;
    }

    pub(crate) fn off(&mut self) {
        self.is_on = false;
    }

    pub(crate) fn toggle(&mut self) {
        self.is_on = !self.is_on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels() {
        let s = Switch::new("switch-lobby".into(), "Lobby".into(), None, None, false);
        assert_eq!(s.label(), "OFF");

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["onText"], "ON");
        assert_eq!(json["offText"], "OFF");
        assert_eq!(json["isOn"], false);
    }

    #[test]
    fn toggle_flips_label() {
        let mut s = Switch::new(
            "switch-house".into(),
            "House".into(),
            Some("OPEN".into()),
            Some("CLOSED".into()),
            false,
        );
        s.toggle();
        assert!(s.is_on());
        assert_eq!(s.label(), "OPEN");
        s.toggle();
        assert_eq!(s.label(), "CLOSED");
    }
}

//! Messages between the document side and the preview.
//!
//! Messages are JSON objects tagged by a `type` field:
//!
//! ```text
//! {"type": "setConfig", "config": "...", "description": {...}}   document → preview
//! {"type": "updateConfig", "text": "..."}                         preview → document
//! {"type": "execSpright", "text": "..."}                          preview → document
//! ```

use serde::{Deserialize, Serialize};

use spright_core::description::Description;

use crate::orchestrator::SyncState;

/// Messages sent to the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ToPreview {
    /// Delivers the state of a completed refresh cycle.
    SetConfig {
        config: String,
        description: Description,
    },
}

impl ToPreview {
    /// Serializes the message to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the description contains values JSON cannot hold.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<SyncState> for ToPreview {
    fn from(state: SyncState) -> Self {
        let (config, description) = state.into_parts();
        Self::SetConfig {
            config,
            description,
        }
    }
}

/// Messages sent by the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FromPreview {
    /// Replaces the whole document with `text`.
    UpdateConfig { text: String },

    /// Runs autocomplete on `text` and logs the output.
    ExecSpright { text: String },
}

impl FromPreview {
    /// Parses a message from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or an unknown `type`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_set_config_tag() {
        let message = ToPreview::from(SyncState::new("sheet\n", Description::default()));
        let value: Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "setConfig");
        assert_eq!(value["config"], "sheet\n");
        assert_eq!(value["description"]["inputs"], json!([]));
    }

    #[test]
    fn test_set_config_keeps_source_uris_over_json() {
        let mut description = Description::from_json(
            r#"{"inputs": [], "sprites": [], "sources": [
                {"index": 0, "filename": "a.png", "width": 8, "height": 8}
            ]}"#,
        )
        .unwrap();
        description.sources_mut()[0].set_uri("file:///work/a.png");
        let message = ToPreview::from(SyncState::new("input a.png\n", description));

        let json = message.to_json().unwrap();
        assert!(json.contains("file:///work/a.png"));

        let received: ToPreview = serde_json::from_str(&json).unwrap();
        let ToPreview::SetConfig { description, .. } = &received;
        assert_eq!(description.sources()[0].uri(), Some("file:///work/a.png"));
        assert_eq!(received, message);
    }

    #[test]
    fn test_from_preview_tags() {
        let update = FromPreview::from_json(r#"{"type": "updateConfig", "text": "sheet"}"#).unwrap();
        assert_eq!(
            update,
            FromPreview::UpdateConfig {
                text: "sheet".to_string()
            }
        );

        let exec = FromPreview::from_json(r#"{"type": "execSpright", "text": "input"}"#).unwrap();
        assert_eq!(
            exec,
            FromPreview::ExecSpright {
                text: "input".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(FromPreview::from_json(r#"{"type": "deleteInput", "text": ""}"#).is_err());
    }
}

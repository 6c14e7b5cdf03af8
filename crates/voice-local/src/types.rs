use serde::{Deserialize, Serialize};

/// Recognized text as returned by a backend, before any normalization.
pub type HeardText = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// BCP-47 tag handed to the recognizer, e.g. `en-US`.
    pub language: Option<String>,
    /// Print a prompt before each listen (console backend only).
    #[serde(default = "default_prompt")]
    pub show_prompt: bool,
}

fn default_prompt() -> bool {
    true
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            language: Some("en-US".to_string()),
            show_prompt: default_prompt(),
        }
    }
}

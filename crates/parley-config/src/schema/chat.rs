use serde::{Deserialize, Serialize};

/// User-facing texts shown when an exchange fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Assistant-role message appended to the transcript on failure.
    pub failure_notice: String,
    /// Error notification shown on failure.
    pub failure_toast: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            failure_notice: "Sorry, I encountered an error. Please try again or start a new chat."
                .into(),
            failure_toast: "Failed to send message. Please try again.".into(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Session identifier persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON key-value file holding the session id. Defaults to
    /// `<data_dir>/parley/state.json` when unset.
    pub state_file: Option<String>,
    /// Key under which the session id is stored.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            storage_key: "sessionId".into(),
        }
    }
}

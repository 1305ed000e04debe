//! Assistant service endpoint and user identity.

use serde::{Deserialize, Serialize};

/// Where the assistant API lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the versioned API, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// TCP connect timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

/// Identity sent along with every chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub email: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            email: "john@example.com".into(),
        }
    }
}

//! HTTP transport configuration.

use std::time::Duration;

use parley_config::ParleyConfig;

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(config: &ParleyConfig) -> Self {
        Self::new(config.server.base_url.trim())
            .with_connect_timeout(Duration::from_secs(config.server.connect_timeout_secs.into()))
            .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs.into()))
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

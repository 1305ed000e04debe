//! HTTP transport struct, URL building, and error mapping.

use serde::{Deserialize, Serialize};

use parley_common::Message;

use super::config::HttpConfig;
use crate::TransportError;

/// `Transport` over HTTP/JSON.
pub struct HttpTransport {
    pub(crate) config: HttpConfig,
    pub(crate) base: reqwest::Url,
    pub(crate) http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let base = reqwest::Url::parse(&config.base_url).map_err(|e| {
            TransportError::Network(format!("invalid base URL {:?}: {e}", config.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::Network(format!(
                "invalid base URL {:?}: cannot be a base",
                config.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, base, http })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub query: &'a str,
    pub session_id: &'a str,
    pub user_email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryBody {
    #[serde(default)]
    pub messages: Vec<Message>,
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_decode() {
        TransportError::Parse(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

/// Turn a non-2xx response into an `Api` error, preferring the body's
/// `detail` field over `fallback`.
pub(crate) async fn error_from_response(
    response: reqwest::Response,
    fallback: &str,
) -> TransportError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    TransportError::Api {
        status,
        detail: extract_detail(&body).unwrap_or_else(|| fallback.to_string()),
    }
}

pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

//! Conversation engine for Parley.
//!
//! Provides:
//! - The `Transport` contract for the assistant service, plus an HTTP client
//! - Session identity persistence over a key-value store
//! - The conversation store, the one-at-a-time send state machine, and the
//!   session lifecycle composing them
//! - The `Presenter` contract through which all state changes are rendered

pub mod http;
pub mod presentation;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use parley_common::{Message, SessionId};

pub use http::{HttpConfig, HttpTransport};
pub use presentation::{NullPresenter, Presenter};
pub use session::{
    ConversationStore, Exchange, ExchangeResult, NewConversation, RejectReason, SendController,
    SendState, SessionError, SessionIdentity, SessionLifecycle, StartReport, SubmitOutcome,
    DEFAULT_STORAGE_KEY, DEFAULT_USER_IDENTITY,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// The assistant service as seen by the session core.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit one user query and wait for the assistant's reply.
    async fn send(
        &self,
        query: &str,
        session_id: &SessionId,
        user_identity: &str,
    ) -> Result<ChatReply, TransportError>;

    /// Fetch the server-held transcript for a session.
    async fn fetch_history(&self, session_id: &SessionId) -> Result<HistoryFetch, TransportError>;

    /// Delete the server-held transcript for a session.
    async fn delete_history(&self, session_id: &SessionId) -> Result<DeleteReceipt, TransportError>;

    /// Liveness probe; unrelated to conversation state.
    async fn health_check(&self) -> Result<HealthStatus, TransportError>;
}

/// Successful reply to a chat request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            metadata: serde_json::Value::Null,
            intent: None,
            data_source: None,
        }
    }
}

/// Result of a history lookup. A session the server has never seen is
/// `NotFound`, which callers treat as an empty conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryFetch {
    Found(Vec<Message>),
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeleteReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("request timed out")]
    Timeout,
}

impl TransportError {
    /// Machine-readable failure reason: the server's `detail` for API
    /// errors, the display text otherwise.
    pub fn reason(&self) -> String {
        match self {
            TransportError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

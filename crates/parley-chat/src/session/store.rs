//! In-memory transcript of the active session.

use std::sync::Mutex;

use parley_common::{Message, SessionId};
use tracing::debug;

use crate::{lock, HistoryFetch, Transport, TransportError};

/// Ordered, append-only message sequence. Only `reset` and `hydrate` ever
/// remove entries, and both replace the whole sequence at once.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Mutex<Vec<Message>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the transcript with the server-held history for `session_id`.
    ///
    /// `NotFound` yields an empty transcript. Any other failure also leaves
    /// the transcript empty and is returned for reporting.
    pub async fn hydrate(
        &self,
        transport: &dyn Transport,
        session_id: &SessionId,
    ) -> Result<usize, TransportError> {
        match transport.fetch_history(session_id).await {
            Ok(HistoryFetch::Found(messages)) => {
                let count = messages.len();
                *lock(&self.messages) = messages;
                debug!(session = %session_id, count, "history restored");
                Ok(count)
            }
            Ok(HistoryFetch::NotFound) => {
                self.reset();
                debug!(session = %session_id, "no server history");
                Ok(0)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    pub fn append(&self, message: Message) {
        lock(&self.messages).push(message);
    }

    pub fn reset(&self) {
        lock(&self.messages).clear();
    }

    /// Ordered copy of the current transcript.
    pub fn snapshot(&self) -> Vec<Message> {
        lock(&self.messages).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.messages).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.messages).is_empty()
    }

    pub fn last(&self) -> Option<Message> {
        lock(&self.messages).last().cloned()
    }
}

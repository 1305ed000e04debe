//! Test doubles for the transport, presenter and storage contracts.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_common::{Message, Notification, SessionId, StorageError};
use tokio::sync::Notify;

use crate::presentation::Presenter;
use crate::storage::KeyValueStore;
use crate::{
    lock, ChatReply, DeleteReceipt, HealthStatus, HistoryFetch, Transport, TransportError,
};

/// One recorded `send` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SentQuery {
    pub query: String,
    pub session_id: String,
    pub user_identity: String,
}

/// Parks `send` until released. `entered` fires once the call is inside the
/// transport.
#[derive(Clone, Default)]
pub struct SendGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// In-memory assistant service.
///
/// Replies are served from a queue (an empty queue answers `"ok"`).
/// Successful sends are recorded in a per-session history so that
/// `fetch_history` behaves like the real server.
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<ChatReply, TransportError>>>,
    histories: Mutex<HashMap<String, Vec<Message>>>,
    history_failures: Mutex<VecDeque<TransportError>>,
    delete_failures: Mutex<VecDeque<TransportError>>,
    sent: Mutex<Vec<SentQuery>>,
    deleted: Mutex<Vec<String>>,
    gate: Mutex<Option<SendGate>>,
    health: Mutex<Result<HealthStatus, TransportError>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            histories: Mutex::new(HashMap::new()),
            history_failures: Mutex::new(VecDeque::new()),
            delete_failures: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            health: Mutex::new(Ok(HealthStatus {
                status: "healthy".into(),
                message: "mock".into(),
            })),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn push_reply(&self, reply: Result<ChatReply, TransportError>) {
        lock(&self.replies).push_back(reply);
    }

    pub fn set_history(&self, session_id: &str, messages: Vec<Message>) {
        lock(&self.histories).insert(session_id.to_string(), messages);
    }

    pub fn history(&self, session_id: &str) -> Option<Vec<Message>> {
        lock(&self.histories).get(session_id).cloned()
    }

    pub fn fail_next_history(&self, error: TransportError) {
        lock(&self.history_failures).push_back(error);
    }

    pub fn fail_next_delete(&self, error: TransportError) {
        lock(&self.delete_failures).push_back(error);
    }

    pub fn set_health(&self, health: Result<HealthStatus, TransportError>) {
        *lock(&self.health) = health;
    }

    /// Make every subsequent `send` and `delete_history` wait on the returned
    /// gate.
    pub fn install_gate(&self) -> SendGate {
        let gate = SendGate::default();
        *lock(&self.gate) = Some(gate.clone());
        gate
    }

    pub fn sent(&self) -> Vec<SentQuery> {
        lock(&self.sent).clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        query: &str,
        session_id: &SessionId,
        user_identity: &str,
    ) -> Result<ChatReply, TransportError> {
        lock(&self.sent).push(SentQuery {
            query: query.to_string(),
            session_id: session_id.to_string(),
            user_identity: user_identity.to_string(),
        });
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let reply = lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Ok(ChatReply::new("ok")));
        if let Ok(reply) = &reply {
            lock(&self.histories)
                .entry(session_id.to_string())
                .or_default()
                .extend([Message::user(query), Message::assistant(reply.response.clone())]);
        }
        reply
    }

    async fn fetch_history(&self, session_id: &SessionId) -> Result<HistoryFetch, TransportError> {
        if let Some(error) = lock(&self.history_failures).pop_front() {
            return Err(error);
        }
        Ok(match lock(&self.histories).get(session_id.as_str()) {
            Some(messages) => HistoryFetch::Found(messages.clone()),
            None => HistoryFetch::NotFound,
        })
    }

    async fn delete_history(&self, session_id: &SessionId) -> Result<DeleteReceipt, TransportError> {
        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if let Some(error) = lock(&self.delete_failures).pop_front() {
            return Err(error);
        }
        lock(&self.histories).remove(session_id.as_str());
        lock(&self.deleted).push(session_id.to_string());
        Ok(DeleteReceipt {
            success: true,
            message: format!("Conversation {session_id} deleted successfully"),
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, TransportError> {
        lock(&self.health).clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Rendered(Message),
    Typing(bool),
    Input(bool),
    Notified(Notification),
    Session(String),
    Cleared,
}

/// Presenter that records every call in order.
#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PresenterEvent> {
        lock(&self.events).clone()
    }

    pub fn take_events(&self) -> Vec<PresenterEvent> {
        std::mem::take(&mut *lock(&self.events))
    }

    pub fn rendered(&self) -> Vec<Message> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Rendered(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Notified(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(Notification::is_error)
            .collect()
    }

    fn record(&self, event: PresenterEvent) {
        lock(&self.events).push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn render_message(&self, message: &Message) {
        self.record(PresenterEvent::Rendered(message.clone()));
    }

    fn set_typing(&self, visible: bool) {
        self.record(PresenterEvent::Typing(visible));
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.record(PresenterEvent::Input(enabled));
    }

    fn notify(&self, notification: Notification) {
        self.record(PresenterEvent::Notified(notification));
    }

    fn show_session(&self, session_id: &SessionId) {
        self.record(PresenterEvent::Session(session_id.to_string()));
    }

    fn clear_messages(&self) {
        self.record(PresenterEvent::Cleared);
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }
}

//! Session lifecycle: start, submit, new chat, delete.

use std::sync::Arc;

use parley_common::{Message, Notification, SessionId};
use tracing::{debug, info, warn};

use super::controller::{Exchange, SendController};
use super::identity::SessionIdentity;
use super::store::ConversationStore;
use super::types::{NewConversation, SendState, SessionError, StartReport, SubmitOutcome};
use crate::presentation::Presenter;
use crate::{HealthStatus, Transport, TransportError};

/// Default user identity sent with every query.
pub const DEFAULT_USER_IDENTITY: &str = "john@example.com";

/// Owns the conversation state of the single active session and composes
/// identity, store and controller behind one entry point.
///
/// Every operation takes `&self`; share it behind an `Arc` if several tasks
/// need to drive it.
pub struct SessionLifecycle {
    identity: SessionIdentity,
    store: ConversationStore,
    controller: SendController,
    transport: Arc<dyn Transport>,
    presenter: Arc<dyn Presenter>,
    user_identity: String,
}

impl SessionLifecycle {
    pub fn new(
        identity: SessionIdentity,
        transport: Arc<dyn Transport>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            identity,
            store: ConversationStore::new(),
            controller: SendController::default(),
            transport,
            presenter,
            user_identity: DEFAULT_USER_IDENTITY.to_string(),
        }
    }

    pub fn with_user_identity(mut self, user_identity: impl Into<String>) -> Self {
        self.user_identity = user_identity.into();
        self
    }

    /// Override the failure notice and error toast shown when an exchange fails.
    pub fn with_failure_texts(
        mut self,
        notice: impl Into<String>,
        toast: impl Into<String>,
    ) -> Self {
        self.controller = SendController::new(notice, toast);
        self
    }

    /// Load (or create) the session id and restore its server-held history.
    ///
    /// A history failure is reported to the presenter and in the returned
    /// report; the session still starts, empty.
    pub async fn start(&self) -> Result<StartReport, SessionError> {
        let _guard = self.controller.begin().map_err(|_| SessionError::Busy)?;

        let session_id = self.identity.load();
        self.presenter.show_session(&session_id);

        let (restored, history_error) =
            match self.store.hydrate(self.transport.as_ref(), &session_id).await {
                Ok(count) => (count, None),
                Err(e) => {
                    warn!(session = %session_id, error = %e, "failed to load conversation history");
                    self.presenter
                        .notify(Notification::error("Failed to load conversation history"));
                    (0, Some(e))
                }
            };

        for message in self.store.snapshot() {
            self.presenter.render_message(&message);
        }

        info!(session = %session_id, restored, "session started");
        Ok(StartReport {
            session_id,
            restored,
            history_error,
        })
    }

    /// Run one exchange for `query` on the active session.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let (admitted, query) = match self.controller.admit(query) {
            Ok(admitted) => admitted,
            Err(reason) => return SubmitOutcome::Rejected(reason),
        };
        // Read under the guard so a concurrent new chat cannot swap the id
        // between this read and the exchange.
        let session_id = self.identity.load();
        self.controller
            .run(
                admitted,
                query,
                Exchange {
                    store: &self.store,
                    transport: self.transport.as_ref(),
                    presenter: self.presenter.as_ref(),
                    session_id: &session_id,
                    user_identity: &self.user_identity,
                },
            )
            .await
    }

    /// Replace the active session with a fresh one. The previous transcript
    /// stays on the server under the old id.
    pub fn new_conversation(&self, confirmed: bool) -> Result<NewConversation, SessionError> {
        if !confirmed {
            debug!("new conversation declined");
            return Ok(NewConversation::Declined);
        }
        let _guard = self.controller.begin().map_err(|_| SessionError::Busy)?;

        let previous = self.identity.current();
        let session_id = self.identity.renew();
        self.store.reset();
        self.presenter.clear_messages();
        self.presenter.show_session(&session_id);
        self.presenter
            .notify(Notification::success("New conversation started!"));

        info!(
            previous = previous.as_ref().map(SessionId::as_str).unwrap_or("-"),
            session = %session_id,
            "new conversation started"
        );
        Ok(NewConversation::Started(session_id))
    }

    /// Delete the server-held history of the active session and clear the
    /// local transcript. The session id is kept.
    pub async fn delete_conversation(&self) -> Result<SessionId, SessionError> {
        let _guard = self.controller.begin().map_err(|_| SessionError::Busy)?;

        let session_id = self.identity.load();
        match self.transport.delete_history(&session_id).await {
            Ok(receipt) => {
                self.store.reset();
                self.presenter.clear_messages();
                self.presenter.notify(Notification::success("Conversation deleted"));
                info!(session = %session_id, server_message = %receipt.message, "conversation deleted");
                Ok(session_id)
            }
            Err(e) => {
                warn!(session = %session_id, error = %e, "failed to delete conversation");
                self.presenter.notify(Notification::error(format!(
                    "Failed to delete conversation: {}",
                    e.reason()
                )));
                Err(e.into())
            }
        }
    }

    pub async fn health_check(&self) -> Result<HealthStatus, TransportError> {
        self.transport.health_check().await
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.store.snapshot()
    }

    pub fn session_id(&self) -> SessionId {
        self.identity.load()
    }

    pub fn send_state(&self) -> SendState {
        self.controller.state()
    }

    /// True only while an exchange awaits its reply.
    pub fn is_sending(&self) -> bool {
        self.send_state() == SendState::Sending
    }

    pub fn user_identity(&self) -> &str {
        &self.user_identity
    }

    pub fn teardown(self) {
        let messages = self.store.len();
        match self.identity.current() {
            Some(id) => info!(session = %id, messages, "session closed"),
            None => debug!("session closed before start"),
        }
    }
}

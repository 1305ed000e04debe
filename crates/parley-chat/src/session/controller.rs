//! One-at-a-time exchange state machine.

use std::sync::atomic::{AtomicBool, Ordering};

use parley_common::{new_correlation_id, Message, Notification, SessionId};
use parley_config::schema::ChatConfig;
use tracing::{debug, info, warn};

use super::store::ConversationStore;
use super::types::{BusyGuard, ExchangeResult, RejectReason, SendState, SubmitOutcome};
use crate::presentation::Presenter;
use crate::Transport;

/// Everything one exchange is allowed to touch.
pub struct Exchange<'a> {
    pub store: &'a ConversationStore,
    pub transport: &'a dyn Transport,
    pub presenter: &'a dyn Presenter,
    pub session_id: &'a SessionId,
    pub user_identity: &'a str,
}

/// Drives a single submission through `Idle -> Sending -> Idle`.
///
/// `busy` makes the session exclusive: it is held for a whole exchange and
/// by lifecycle operations (start, new chat, delete). `sending` is only set
/// while an exchange is in flight and is what `state()` reports.
pub struct SendController {
    busy: AtomicBool,
    sending: AtomicBool,
    failure_notice: String,
    failure_toast: String,
}

impl SendController {
    pub fn new(failure_notice: impl Into<String>, failure_toast: impl Into<String>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            sending: AtomicBool::new(false),
            failure_notice: failure_notice.into(),
            failure_toast: failure_toast.into(),
        }
    }

    pub fn state(&self) -> SendState {
        if self.sending.load(Ordering::Acquire) {
            SendState::Sending
        } else {
            SendState::Idle
        }
    }

    /// Text appended as the assistant's turn when an exchange fails.
    pub fn failure_notice(&self) -> &str {
        &self.failure_notice
    }

    /// Take exclusive use of the session for the guard's lifetime.
    pub(crate) fn begin(&self) -> Result<BusyGuard<'_>, RejectReason> {
        BusyGuard::acquire(&self.busy)
    }

    /// Check `query` and take the guard. Returns the trimmed query.
    pub(crate) fn admit<'q>(
        &self,
        query: &'q str,
    ) -> Result<(BusyGuard<'_>, &'q str), RejectReason> {
        let query = query.trim();
        if query.is_empty() {
            debug!("empty query ignored");
            return Err(RejectReason::Empty);
        }
        let guard = self.begin().map_err(|reason| {
            debug!("submit rejected while busy");
            reason
        })?;
        Ok((guard, query))
    }

    pub async fn submit(&self, query: &str, exchange: Exchange<'_>) -> SubmitOutcome {
        match self.admit(query) {
            Ok((admitted, query)) => self.run(admitted, query, exchange).await,
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }

    /// Run an exchange admitted by `admit`. The guard is released once the
    /// reply or failure notice has been recorded.
    pub(crate) async fn run(
        &self,
        _admitted: BusyGuard<'_>,
        query: &str,
        exchange: Exchange<'_>,
    ) -> SubmitOutcome {
        let _sending = BusyGuard::mark(&self.sending);
        let Exchange {
            store,
            transport,
            presenter,
            session_id,
            user_identity,
        } = exchange;
        let exchange_id = new_correlation_id();

        let user_message = Message::user(query);
        store.append(user_message.clone());
        presenter.render_message(&user_message);
        presenter.set_input_enabled(false);
        presenter.set_typing(true);

        debug!(session = %session_id, exchange = %exchange_id, "sending query");
        let reply = transport.send(query, session_id, user_identity).await;
        presenter.set_typing(false);

        let result = match reply {
            Ok(reply) => {
                info!(
                    session = %session_id,
                    exchange = %exchange_id,
                    intent = reply.intent.as_deref().unwrap_or("-"),
                    data_source = reply.data_source.as_deref().unwrap_or("-"),
                    "exchange completed"
                );
                let assistant_message = Message::assistant(reply.response);
                store.append(assistant_message.clone());
                presenter.render_message(&assistant_message);
                ExchangeResult::Success { assistant_message }
            }
            Err(e) => {
                warn!(session = %session_id, exchange = %exchange_id, error = %e, "exchange failed");
                let notice = Message::assistant(self.failure_notice.clone());
                store.append(notice.clone());
                presenter.render_message(&notice);
                presenter.notify(Notification::error(self.failure_toast.clone()));
                ExchangeResult::Failure { reason: e.reason() }
            }
        };

        presenter.set_input_enabled(true);
        SubmitOutcome::Completed(result)
    }
}

impl Default for SendController {
    fn default() -> Self {
        let chat = ChatConfig::default();
        Self::new(chat.failure_notice, chat.failure_toast)
    }
}

impl std::fmt::Debug for SendController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendController")
            .field("state", &self.state())
            .finish()
    }
}

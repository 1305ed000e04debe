//! Exchange outcomes and the send guard.

use std::sync::atomic::{AtomicBool, Ordering};

use parley_common::{Message, SessionId};

use crate::TransportError;

/// Observable state of the send controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    /// An exchange is waiting for its reply. Lifecycle operations that hold
    /// the session (start, new chat, delete) do not count.
    Sending,
}

/// Result of one exchange that reached the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeResult {
    Success { assistant_message: Message },
    Failure { reason: String },
}

/// Why a submission was refused without contacting the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Query was empty or whitespace only.
    Empty,
    /// Another exchange is in flight.
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(RejectReason),
    Completed(ExchangeResult),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(ExchangeResult::Success { .. }))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

/// Outcome of a "new chat" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewConversation {
    Started(SessionId),
    Declined,
}

/// What `start()` found.
#[derive(Debug, Clone, PartialEq)]
pub struct StartReport {
    pub session_id: SessionId,
    /// Number of messages restored from the server.
    pub restored: usize,
    /// Set when history could not be loaded; the session still starts empty.
    pub history_error: Option<TransportError>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("an exchange is already in flight")]
    Busy,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Holds an atomic flag set; clears it on drop so that an early return or a
/// dropped future always releases it.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, RejectReason> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(RejectReason::Busy);
        }
        Ok(Self { flag })
    }

    /// Set a flag already protected by another held guard.
    pub(crate) fn mark(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

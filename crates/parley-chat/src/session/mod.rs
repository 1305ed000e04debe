//! Conversation session management.
//!
//! `SessionLifecycle` owns the active session: its identity, its transcript
//! (`ConversationStore`) and the `SendController` that runs exchanges one at
//! a time.

mod controller;
mod identity;
mod lifecycle;
mod store;
mod types;

#[cfg(test)]
mod proptests;

pub use controller::{Exchange, SendController};
pub use identity::{SessionIdentity, DEFAULT_STORAGE_KEY};
pub use lifecycle::{SessionLifecycle, DEFAULT_USER_IDENTITY};
pub use store::ConversationStore;
pub use types::{
    ExchangeResult, NewConversation, RejectReason, SendState, SessionError, StartReport,
    SubmitOutcome,
};

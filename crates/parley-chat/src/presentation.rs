//! Presentation contract.
//!
//! The session core pushes every visible change through a `Presenter` and
//! never reads anything back from it.

use parley_common::{Message, Notification, SessionId};

pub trait Presenter: Send + Sync {
    /// Append one message to the visible transcript.
    fn render_message(&self, message: &Message);

    /// Show or hide the "assistant is typing" indicator.
    fn set_typing(&self, visible: bool);

    /// Enable or disable user input.
    fn set_input_enabled(&self, enabled: bool);

    fn notify(&self, notification: Notification);

    /// Display the active session (typically its short form).
    fn show_session(&self, session_id: &SessionId);

    /// Remove every rendered message.
    fn clear_messages(&self);
}

/// Presenter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_message(&self, _message: &Message) {}
    fn set_typing(&self, _visible: bool) {}
    fn set_input_enabled(&self, _enabled: bool) {}
    fn notify(&self, _notification: Notification) {}
    fn show_session(&self, _session_id: &SessionId) {}
    fn clear_messages(&self) {}
}

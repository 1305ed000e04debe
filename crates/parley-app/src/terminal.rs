//! Line-oriented terminal rendering of the conversation.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use parley_chat::Presenter;
use parley_common::{Message, Notification, Role, SessionId};

const TYPING_LINE: &str = "assistant is typing...";

/// `[HH:MM] you: text` in local time.
pub fn format_message(message: &Message) -> String {
    let time = message.created_at.with_timezone(&Local).format("%H:%M");
    let author = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("[{time}] {author}: {}", message.content)
}

pub fn format_notification(notification: &Notification) -> String {
    format!("[{}] {}", notification.level, notification.message)
}

/// Presenter writing to stdout (or any writer).
pub struct TerminalPresenter {
    out: Mutex<Box<dyn Write + Send>>,
    input_enabled: AtomicBool,
    typing: AtomicBool,
}

impl TerminalPresenter {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            input_enabled: AtomicBool::new(true),
            typing: AtomicBool::new(false),
        }
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.load(Ordering::Acquire)
    }

    /// Print the input prompt if input is currently accepted.
    pub fn prompt(&self) {
        if self.input_enabled() {
            self.write_raw("> ");
        }
    }

    /// Print a question without a trailing newline.
    pub fn ask(&self, question: &str) {
        self.write_raw(question);
    }

    /// Print a line of plain text.
    pub fn line(&self, text: &str) {
        self.write_raw(&format!("{text}\n"));
    }

    fn write_raw(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout is not worth failing the session over.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Presenter for TerminalPresenter {
    fn render_message(&self, message: &Message) {
        self.line(&format_message(message));
    }

    fn set_typing(&self, visible: bool) {
        let was = self.typing.swap(visible, Ordering::AcqRel);
        if visible && !was {
            self.write_raw(TYPING_LINE);
        } else if !visible && was {
            self.write_raw("\r\x1b[2K");
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.store(enabled, Ordering::Release);
    }

    fn notify(&self, notification: Notification) {
        self.line(&format_notification(&notification));
    }

    fn show_session(&self, session_id: &SessionId) {
        self.line(&format!("session ...{}", session_id.short()));
    }

    fn clear_messages(&self) {
        self.line("--------------------------------");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn presenter() -> (TerminalPresenter, Buffer) {
        let buffer = Buffer::default();
        (TerminalPresenter::with_writer(Box::new(buffer.clone())), buffer)
    }

    #[test]
    fn message_format_has_time_author_and_text() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let message = Message::assistant("It shipped.").with_created_at(created);
        let expected_time = created.with_timezone(&Local).format("%H:%M").to_string();
        assert_eq!(
            format_message(&message),
            format!("[{expected_time}] assistant: It shipped.")
        );
        assert!(format_message(&Message::user("hi")).ends_with("] you: hi"));
    }

    #[test]
    fn notifications_are_prefixed_by_level() {
        let (presenter, out) = presenter();
        presenter.notify(Notification::success("New conversation started!"));
        assert_eq!(out.text(), "[success] New conversation started!\n");
    }

    #[test]
    fn typing_line_is_erased_once() {
        let (presenter, out) = presenter();
        presenter.set_typing(true);
        presenter.set_typing(true);
        presenter.set_typing(false);
        presenter.set_typing(false);
        assert_eq!(out.text(), format!("{TYPING_LINE}\r\x1b[2K"));
    }

    #[test]
    fn prompt_hidden_while_input_disabled() {
        let (presenter, out) = presenter();
        presenter.set_input_enabled(false);
        presenter.prompt();
        assert_eq!(out.text(), "");
        presenter.set_input_enabled(true);
        presenter.prompt();
        assert_eq!(out.text(), "> ");
    }

    #[test]
    fn session_shows_short_form() {
        let (presenter, out) = presenter();
        presenter.show_session(&SessionId::parse("session_1700000000000_abcdefghi").unwrap());
        assert_eq!(out.text(), "session ...bcdefghi\n");
    }
}

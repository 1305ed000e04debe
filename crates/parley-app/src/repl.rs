//! Interactive read-eval loop over stdin.

use std::sync::Arc;

use parley_chat::{NewConversation, Presenter, RejectReason, SessionLifecycle, SubmitOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::terminal::TerminalPresenter;

pub const NEW_CONVERSATION_PROMPT: &str =
    "Start a new conversation? Current chat will be saved. [y/N] ";

const HELP: &str = "\
Commands:
  /new       start a new conversation
  /delete    delete this conversation's server history
  /history   reprint the transcript
  /health    check the assistant service
  /session   show the full session id
  /help      show this help
  /quit      exit
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    New,
    Delete,
    History,
    Health,
    Session,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(name) = trimmed.strip_prefix('/') else {
        return Command::Say(line.to_string());
    };
    match name.split_whitespace().next().unwrap_or("") {
        "new" => Command::New,
        "delete" => Command::Delete,
        "history" => Command::History,
        "health" => Command::Health,
        "session" => Command::Session,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Run until `/quit`, end of input or Ctrl-C. A stdin read error ends the
/// loop and is returned.
pub async fn run(
    lifecycle: &SessionLifecycle,
    presenter: Arc<TerminalPresenter>,
) -> parley_common::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    presenter.line("Type /help for commands.");

    loop {
        presenter.prompt();
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                presenter.line("");
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(e.into()),
        };

        match parse_command(&line) {
            Command::Say(query) => submit(lifecycle, &query).await,
            Command::New => {
                presenter.ask(NEW_CONVERSATION_PROMPT);
                let confirmed = read_answer(&mut lines).await;
                match lifecycle.new_conversation(confirmed) {
                    Ok(NewConversation::Started(_)) => {}
                    Ok(NewConversation::Declined) => presenter.line("Keeping the current conversation."),
                    Err(e) => presenter.line(&format!("cannot start a new conversation: {e}")),
                }
            }
            Command::Delete => {
                // Failures are already reported through the presenter.
                if let Err(e) = lifecycle.delete_conversation().await {
                    debug!(error = %e, "delete failed");
                }
            }
            Command::History => {
                for message in lifecycle.snapshot() {
                    presenter.render_message(&message);
                }
            }
            Command::Health => match lifecycle.health_check().await {
                Ok(health) => presenter.line(&format!("{}: {}", health.status, health.message)),
                Err(e) => presenter.line(&format!("health check failed: {e}")),
            },
            Command::Session => presenter.line(lifecycle.session_id().as_str()),
            Command::Help => presenter.line(HELP),
            Command::Quit => break,
            Command::Unknown(name) => {
                presenter.line(&format!("unknown command /{name}; try /help"));
            }
        }
    }
    Ok(())
}

async fn submit(lifecycle: &SessionLifecycle, query: &str) {
    match lifecycle.submit(query).await {
        SubmitOutcome::Rejected(RejectReason::Empty) => {}
        SubmitOutcome::Rejected(RejectReason::Busy) => debug!("submit rejected: busy"),
        SubmitOutcome::Completed(result) => debug!(?result, "exchange finished"),
    }
}

async fn read_answer<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> bool {
    match lines.next_line().await {
        Ok(Some(answer)) => is_confirmation(&answer),
        _ => false,
    }
}

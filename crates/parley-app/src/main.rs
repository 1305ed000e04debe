mod cli;
mod repl;
mod terminal;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use parley_chat::{
    FileStore, HttpConfig, HttpTransport, KeyValueStore, MemoryStore, SessionIdentity,
    SessionLifecycle,
};
use parley_common::ConfigError;
use parley_config::ParleyConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalPresenter;

const DEFAULT_LOG_DIRECTIVE: &str = "parley=info";

/// Config for this run, plus the error that forced defaults if any.
///
/// An explicit `--config` must load and validate. Problems with the default
/// location fall back to defaults.
fn load_config(path: Option<&str>) -> parley_common::Result<(ParleyConfig, Option<ConfigError>)> {
    match path {
        Some(path) => Ok((parley_config::load_config_from(Path::new(path))?, None)),
        None => Ok(match parley_config::load_config() {
            Ok(config) => (config, None),
            Err(e) => (ParleyConfig::default(), Some(e)),
        }),
    }
}

fn init_logging(directive: &str) {
    let directive = directive.parse::<Directive>().unwrap_or_else(|_| {
        eprintln!("invalid log directive '{directive}', using {DEFAULT_LOG_DIRECTIVE}");
        DEFAULT_LOG_DIRECTIVE
            .parse::<Directive>()
            .unwrap_or_else(|_| LevelFilter::INFO.into())
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn open_storage(config: &ParleyConfig) -> Arc<dyn KeyValueStore> {
    let path = match &config.session.state_file {
        Some(path) => Ok(PathBuf::from(path)),
        None => FileStore::default_path(),
    };
    match path {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "using session state file");
            Arc::new(FileStore::new(path))
        }
        Err(e) => {
            tracing::warn!(error = %e, "no state file location, session will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn probe(transport: &HttpTransport) -> ExitCode {
    use parley_chat::Transport;

    match transport.health_check().await {
        Ok(health) if health.is_healthy() => {
            println!("{}: {}", health.status, health.message);
            ExitCode::SUCCESS
        }
        Ok(health) => {
            println!("{}: {}", health.status, health.message);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("health check failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Logging depends on the config, so config errors are reported after init.
    let (mut config, config_error) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            return ExitCode::from(2);
        }
    };

    let directive = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.logging.level.directive());
    init_logging(directive);

    tracing::info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = &config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    if let Some(server) = args.server {
        config.server.base_url = server;
    }

    let transport = match HttpTransport::new(HttpConfig::from_config(&config)) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("invalid server configuration: {e}");
            return ExitCode::from(2);
        }
    };
    tracing::info!(server = transport.base_url(), "assistant service");

    if args.health {
        return probe(&transport).await;
    }

    let identity =
        SessionIdentity::with_key(open_storage(&config), config.session.storage_key.clone());
    let presenter = Arc::new(TerminalPresenter::stdout());
    let lifecycle = SessionLifecycle::new(identity, Arc::new(transport), presenter.clone())
        .with_user_identity(config.user.email.clone())
        .with_failure_texts(
            config.chat.failure_notice.clone(),
            config.chat.failure_toast.clone(),
        );

    match lifecycle.start().await {
        Ok(report) => tracing::info!(
            session = %report.session_id,
            restored = report.restored,
            "ready"
        ),
        Err(e) => {
            eprintln!("failed to start session: {e}");
            return ExitCode::FAILURE;
        }
    }

    let outcome = repl::run(&lifecycle, presenter).await;
    lifecycle.teardown();
    match outcome {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "input loop failed");
            ExitCode::FAILURE
        }
    }
}

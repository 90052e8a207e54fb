pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod models;
pub mod nlp;
pub mod store;

pub use crate::config::AgentConfig;
pub use crate::dispatcher::Dispatcher;
pub use crate::errors::{AppError, AppResult};
pub use crate::models::{AgentResponse, Item, ResponseCode, ResponseStatus, StorageKind};
pub use crate::store::{open_store, FileStore, ListStore, TableStore};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

/// Send JSON logs to a daily rolling file under `log_dir`.
pub fn init_tracing(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "todo-agent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

/// Plain-text logs on stderr, for when no log directory is configured.
pub fn init_stderr_tracing() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| error.to_string())
}

fn env_filter(default_directive: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive))
}

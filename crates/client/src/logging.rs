//! Per-session file logging.
//!
//! The TUI owns the terminal, so log output goes to
//! `<cache dir>/logs/<session>/client.log`. Headless runs also echo to stderr.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive. Drop it last.
pub struct LogSession {
    pub log_file: PathBuf,
    _guard: WorkerGuard,
}

pub fn setup_logging(session_id: Option<&str>, echo_stderr: bool) -> Result<LogSession> {
    let session_id = session_id.map(str::to_owned).unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    });

    let session_log_dir = log_directory().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,battle_runtime=debug"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = echo_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    let log_file = session_log_dir.join("client.log");
    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}", log_file.display());

    Ok(LogSession {
        log_file,
        _guard: guard,
    })
}

/// Platform cache directory, or the temp directory when none is known.
fn log_directory() -> PathBuf {
    ProjectDirs::from("", "", "boss-battle")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("boss-battle").join("logs"))
}

//! File-based logging for the CLI.
//!
//! Logs go to daily-rotated files under `~/.entreno/logs/` so normal command
//! output stays clean. Set `ENTRENO_DEBUG_LOG=1` (or use `RUST_LOG`) for
//! debug-level detail.

use entreno_core::StorageConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    let debug_enabled = std::env::var("ENTRENO_DEBUG_LOG")
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initializes tracing. Returns a guard that must stay alive for the life of
/// the process so buffered log lines get flushed. Falls back to stderr if the
/// log directory cannot be created.
pub fn init() -> Option<WorkerGuard> {
    let logs_dir = StorageConfig::default().logs_dir();
    if fs_err::create_dir_all(&logs_dir).is_err() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "entreno.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

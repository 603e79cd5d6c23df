use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// File the tool's own diagnostics go to while the live view owns the terminal.
pub const DIAGNOSTICS_FILE: &str = "sentence_logger.diag";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global `tracing` subscriber.
///
/// With the terminal view on, events are appended to [`DIAGNOSTICS_FILE`] in
/// `log_dir` through a non-blocking writer; otherwise they go to stderr. The
/// returned guard must stay alive until exit or buffered events are lost.
/// `RUST_LOG` overrides the default `info` level.
pub fn init(log_dir: &Path, to_file: bool) -> Option<WorkerGuard> {
    if to_file {
        let appender = tracing_appender::rolling::never(log_dir, DIAGNOSTICS_FILE);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .with_ansi(false)
            .try_init();
        Some(guard)
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .try_init();
        None
    }
}

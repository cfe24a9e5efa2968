use std::path::Path;

use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr and to a JSON log file.
///
/// Stdout is left for command results. When the log file cannot be opened only
/// the stderr layer is installed. The returned guard must be held until exit so
/// buffered file output is flushed.
pub fn init_logging(log_file: &Path) -> Option<WorkerGuard> {
    let (file_writer, file_error) = match file_writer(log_file) {
        Ok(writer) => (Some(writer), None),
        Err(e) => (None, Some(e)),
    };
    let (non_blocking, guard) = file_writer.unzip();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(non_blocking.map(|writer| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Some(e) = file_error {
        warn!("Logging to stderr only, cannot open {:?}: {:#}", log_file, e);
    }

    guard
}

fn file_writer(log_file: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {:?}", log_file))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)?;

    Ok(tracing_appender::non_blocking(appender))
}

use crate::workdir::WorkshopWorkDir;
use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

/// Sends `tracing` output to the setup log in the working directory.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn setup_logging(work_dir: &WorkshopWorkDir, level: &str) -> Result<()> {
    work_dir.init()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;

    let file_name = work_dir
        .log_file
        .file_name()
        .context("Log file path has no file name")?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(&work_dir.path)
        .with_context(|| format!("Failed to open log file {:?}", work_dir.log_file))?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_timer(SystemTime)
        .with_writer(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::info!(
        "Logging system initialized. Writing to {:?}",
        work_dir.log_file
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unopenable_log_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let log_file = dir.path().join("setup.log");
        // a directory where the log file should be cannot be opened for appending
        fs::create_dir(&log_file).unwrap();
        let work_dir = WorkshopWorkDir {
            path: dir.path().to_path_buf(),
            log_file,
        };

        let result = setup_logging(&work_dir, "info");

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open log file"));
    }
}

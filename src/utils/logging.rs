//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `<config dir>/indicator.log`
//! and rotation on startup keeping 9 historical files.

use crate::error::{IndicatorError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (indicator.log.1 through indicator.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "indicator.log";

/// Initialize the logging system writing into `log_dir`
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
pub fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;
    rotate_logs_on_startup(&log_dir.join(LOG_FILE_NAME))?;

    // Rotation happens above, once per session
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("indicator")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| IndicatorError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| IndicatorError::ConfigError(Box::new(e)))?;

    tracing::info!("Indicator v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Shift `name.N` to `name.N+1`, dropping the oldest, and move the current log to `name.1`
///
/// A fresh log is then created by the appender, so every session keeps its own file.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| IndicatorError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| IndicatorError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;
    use std::fs;

    #[test]
    fn test_rotation_moves_current_log() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);
        fs::write(&log_path, "session 1").unwrap();

        rotate_logs_on_startup(&log_path).unwrap();

        assert!(!log_path.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("indicator.log.1")).unwrap(),
            "session 1"
        );
    }

    #[test]
    fn test_rotation_without_log_is_a_no_op() {
        let dir = create_test_dir();
        rotate_logs_on_startup(&dir.path().join(LOG_FILE_NAME)).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rotation_keeps_at_most_max_files() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);

        for session in 1..=12 {
            fs::write(&log_path, format!("session {session}")).unwrap();
            rotate_logs_on_startup(&log_path).unwrap();
        }

        for i in 1..=MAX_LOG_FILES {
            assert!(dir.path().join(format!("indicator.log.{i}")).exists());
        }
        assert!(!dir.path().join("indicator.log.10").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("indicator.log.1")).unwrap(),
            "session 12"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("indicator.log.9")).unwrap(),
            "session 4"
        );
    }

    #[test]
    fn test_rotation_with_gaps_in_history() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);
        fs::write(&log_path, "current").unwrap();
        fs::write(dir.path().join("indicator.log.5"), "old").unwrap();

        rotate_logs_on_startup(&log_path).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("indicator.log.6")).unwrap(),
            "old"
        );
        assert!(!dir.path().join("indicator.log.2").exists());
    }
}

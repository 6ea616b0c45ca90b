//! File-based logging bootstrap. The terminal belongs to the TUI, so log
//! records go to rolling files under the data directory instead of stderr.
//!
//! Initialization is idempotent for the same directory and never panics.
//! Records are buffered, so [`flush_logging`] must run before the process
//! exits; the handle lives in a static that is never dropped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "coin-mark";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    log_dir: PathBuf,
    logger: LoggerHandle,
}

/// Start the file logger at `level` inside `log_dir`.
///
/// Calling this again with the same directory is a no-op; a different
/// directory is rejected because the backend can only be started once.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        return Err(anyhow!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }

    LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        fs::create_dir_all(log_dir).with_context(|| {
            format!("failed to create log directory `{}`", log_dir.display())
        })?;

        let logger = Logger::try_with_str(level)
            .with_context(|| format!("invalid log level `{level}`"))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .context("failed to start logger")?;

        info!(
            "event=app_start status=ok platform={} version={} level={} log_dir={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            log_dir: log_dir.to_path_buf(),
            logger,
        })
    })?;

    Ok(())
}

/// Push buffered records to disk. A no-op when logging never started.
pub fn flush_logging() {
    if let Some(state) = LOGGING_STATE.get() {
        state.logger.flush();
    }
}

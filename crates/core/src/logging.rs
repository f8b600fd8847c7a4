//! JSON run logs.
//!
//! [`init_logging`] installs a `tracing` subscriber writing one JSON file per
//! process run, `navshell-<run_id>.json`, through a non-blocking writer. The
//! run id is a UUID v7, so file names sort chronologically and the oldest runs
//! can be pruned by name when more than `max-files` logs accumulate.
//!
//! The configured level is a default: `RUST_LOG` takes precedence.
//!
//! ```bash
//! RUST_LOG=navshell_core::router=debug,info ./host
//! ```
//!
//! ```no_run
//! use navshell_core::logging::{init_logging, run_id, shutdown_logging};
//! use navshell_core::settings::LoggingSettings;
//!
//! init_logging(&LoggingSettings::default())?;
//! tracing::info!(run_id = run_id(), "host started");
//! shutdown_logging();
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::settings::LoggingSettings;
use anyhow::{Context, Error};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock};
use std::thread;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "navshell-";
const LOG_FILE_SUFFIX: &str = "json";
/// Upper bound on waiting for the writer thread to flush at shutdown.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

static LOG_GUARD: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Identifier of this process run, stable for the process lifetime.
pub fn run_id() -> &'static str {
    RUN_ID.get_or_init(|| Uuid::now_v7().to_string()).as_str()
}

/// Installs the global subscriber. Does nothing when logging is disabled.
///
/// # Errors
///
/// Fails if the log directory can't be created or pruned, if the level is not
/// a valid filter directive, or if a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), Error> {
    if !settings.enabled {
        return Ok(());
    }

    let log_dir = log_directory(&settings.directory)?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("can't create log directory {}", log_dir.display()))?;

    prune_run_logs(&log_dir, settings.max_files)?;

    let appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::NEVER)
        .filename_prefix(format!("{LOG_FILE_PREFIX}{}", run_id()))
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&log_dir)
        .context("can't initialize log file appender")?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(Mutex::new(Some(guard)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .with_current_span(true);

    tracing_subscriber::registry()
        .with(build_filter(&settings.level)?)
        .with(fmt_layer)
        .try_init()
        .context("can't initialize tracing subscriber")?;

    tracing::info!(run_id = run_id(), version = VERSION, "logging initialized");

    Ok(())
}

/// Flushes buffered log lines. Call once before the process exits.
pub fn shutdown_logging() {
    let Some(mutex) = LOG_GUARD.get() else {
        return;
    };
    let Ok(mut slot) = mutex.lock() else {
        return;
    };
    let Some(guard) = slot.take() else {
        return;
    };

    // Dropping the guard blocks until the writer drains; don't hang on it.
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        drop(guard);
        let _ = tx.send(());
    });
    if rx.recv_timeout(FLUSH_TIMEOUT).is_err() {
        eprintln!("navshell: log flush timed out");
    }
}

fn log_directory(directory: &Path) -> Result<PathBuf, Error> {
    if directory.is_absolute() {
        return Ok(directory.to_path_buf());
    }
    let cwd = std::env::current_dir().context("can't get current working directory")?;
    Ok(cwd.join(directory))
}

fn build_filter(level: &str) -> Result<EnvFilter, Error> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = match level.trim() {
        "" => "info",
        level => level,
    };
    EnvFilter::builder()
        .parse(level)
        .with_context(|| format!("invalid logging level {level:?}"))
}

fn is_run_log(file_name: &str) -> bool {
    file_name.starts_with(LOG_FILE_PREFIX) && file_name.ends_with(LOG_FILE_SUFFIX)
}

/// Run log file names in `log_dir`, oldest first.
fn run_logs(log_dir: &Path) -> Result<Vec<String>, Error> {
    let mut names = Vec::new();
    for entry in fs::read_dir(log_dir)
        .with_context(|| format!("can't read log directory {}", log_dir.display()))?
    {
        let entry = entry.context("can't read log directory entry")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_run_log(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Deletes the oldest run logs so that at most `max_files - 1` remain, leaving
/// room for the log of the run being started. `0` keeps everything.
fn prune_run_logs(log_dir: &Path, max_files: usize) -> Result<(), Error> {
    if max_files == 0 {
        return Ok(());
    }

    let names = run_logs(log_dir)?;
    let excess = (names.len() + 1).saturating_sub(max_files);
    for name in names.into_iter().take(excess) {
        let path = log_dir.join(&name);
        fs::remove_file(&path)
            .with_context(|| format!("can't remove old log file {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_run_log(dir: &Path, index: usize) -> Result<(), Error> {
        fs::write(dir.join(format!("{LOG_FILE_PREFIX}{index:04}.{LOG_FILE_SUFFIX}")), b"{}")?;
        Ok(())
    }

    #[test]
    fn prune_keeps_room_for_the_new_run() -> Result<(), Error> {
        let dir = TempDir::new()?;
        for index in 1..=5 {
            create_run_log(dir.path(), index)?;
        }
        fs::write(dir.path().join("notes.txt"), b"keep")?;

        prune_run_logs(dir.path(), 3)?;

        assert_eq!(
            run_logs(dir.path())?,
            vec!["navshell-0004.json", "navshell-0005.json"]
        );
        assert!(dir.path().join("notes.txt").exists());
        Ok(())
    }

    #[test]
    fn prune_with_zero_keeps_everything() -> Result<(), Error> {
        let dir = TempDir::new()?;
        for index in 1..=3 {
            create_run_log(dir.path(), index)?;
        }

        prune_run_logs(dir.path(), 0)?;

        assert_eq!(run_logs(dir.path())?.len(), 3);
        Ok(())
    }

    #[test]
    fn run_id_is_stable_and_names_are_recognised() {
        assert_eq!(run_id(), run_id());
        assert!(is_run_log(&format!("navshell-{}.json", run_id())));
        assert!(!is_run_log("other-1.json"));
        assert!(!is_run_log("navshell-1.txt"));
    }

    #[test]
    fn disabled_logging_is_a_no_op() -> Result<(), Error> {
        let dir = TempDir::new()?;
        let settings = LoggingSettings {
            enabled: false,
            directory: dir.path().join("logs"),
            ..LoggingSettings::default()
        };

        init_logging(&settings)?;
        assert!(!settings.directory.exists());
        Ok(())
    }

    #[test]
    fn relative_directories_resolve_against_cwd() -> Result<(), Error> {
        let absolute = std::env::temp_dir();
        assert_eq!(log_directory(&absolute)?, absolute);
        assert_eq!(
            log_directory(Path::new("logs"))?,
            std::env::current_dir()?.join("logs")
        );
        Ok(())
    }
}

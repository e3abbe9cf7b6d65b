//! `sheetkit_log`:
//! Process-wide tracing setup: console output plus a JSON rolling log file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default directive when `RUST_LOG` is unset.
pub const C_FILTER_DEFAULT: &str = "info,sheetkit_web=info,sheetkit_proc=info,sheetkit_io_xlsx=info";

/// Logging setup options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLogOptions {
    /// Directory of the rolling log files; `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    /// File name prefix (`app` gives `app.<date>.log`).
    pub file_prefix: String,
    /// Rotated files kept on disk.
    pub max_log_files: usize,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for SpecLogOptions {
    fn default() -> Self {
        Self {
            log_dir: Some(PathBuf::from("logs")),
            file_prefix: "app".to_string(),
            max_log_files: 2,
            default_filter: C_FILTER_DEFAULT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EnumLogInitError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("cannot create log directory {path}: {source}")]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot open rolling log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),
    #[error("global subscriber already set: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the whole process; dropping it flushes
/// and stops the file writer.
pub fn init_logging(options: &SpecLogOptions) -> Result<Option<WorkerGuard>, EnumLogInitError> {
    let filter = derive_env_filter(&options.default_filter)?;

    let (file_layer, guard) = match &options.log_dir {
        Some(log_dir) => {
            let (file_writer, guard) =
                tracing_appender::non_blocking(build_file_appender(log_dir, options)?);
            (
                Some(fmt::layer().json().with_writer(file_writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(guard)
}

fn derive_env_filter(default_filter: &str) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter),
    }
}

fn build_file_appender(
    log_dir: &Path,
    options: &SpecLogOptions,
) -> Result<RollingFileAppender, EnumLogInitError> {
    std::fs::create_dir_all(log_dir).map_err(|source| EnumLogInitError::Dir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&options.file_prefix)
        .filename_suffix("log")
        .max_log_files(usize::max(1, options.max_log_files))
        .build(log_dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(C_FILTER_DEFAULT).is_ok());
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let options = SpecLogOptions {
            log_dir: Some(log_dir.clone()),
            ..Default::default()
        };

        build_file_appender(&log_dir, &options).unwrap();
        assert!(log_dir.is_dir());
    }
}

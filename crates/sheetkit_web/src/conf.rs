//! Server configuration: command line flags with environment fallbacks.

use std::path::PathBuf;

use clap::Parser;
use sheetkit_log::SpecLogOptions;
use sheetkit_proc::{N_MAX_ENTRIES_PER_BATCH_DEFAULT, SpecProcessOptions};

/// Default request body cap (32 MiB).
pub const N_MAX_UPLOAD_BYTES_DEFAULT: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sheetkit",
    version,
    about = "Spreadsheet identifier masking and debit/credit batching service"
)]
pub struct SpecServerConf {
    /// Interface to bind.
    #[arg(long, env = "SHEETKIT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "SHEETKIT_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory served under `/static` (favicon, background image).
    #[arg(long, env = "SHEETKIT_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Directory of the rolling JSON log files.
    #[arg(long, env = "SHEETKIT_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log to the console only.
    #[arg(long, env = "SHEETKIT_NO_LOG_FILE")]
    pub no_log_file: bool,

    /// Largest accepted upload, in bytes.
    #[arg(long, env = "SHEETKIT_MAX_UPLOAD_BYTES", default_value_t = N_MAX_UPLOAD_BYTES_DEFAULT)]
    pub max_upload_bytes: usize,

    /// Rows per split batch (debit/credit pairs times two).
    #[arg(
        long,
        env = "SHEETKIT_MAX_ENTRIES_PER_BATCH",
        default_value_t = N_MAX_ENTRIES_PER_BATCH_DEFAULT
    )]
    pub max_entries_per_batch: usize,
}

impl SpecServerConf {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_options(&self) -> SpecLogOptions {
        SpecLogOptions {
            log_dir: (!self.no_log_file).then(|| self.log_dir.clone()),
            ..Default::default()
        }
    }

    pub fn process_options(&self) -> SpecProcessOptions {
        SpecProcessOptions {
            max_entries_per_batch: self.max_entries_per_batch,
            ..Default::default()
        }
    }
}

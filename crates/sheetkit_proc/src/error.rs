//! Processing error kinds.

use polars::prelude::PolarsError;
use sheetkit_io_xlsx::EnumXlsxIoError;
use thiserror::Error;

/// Failure of a processing run. No partial output accompanies an error.
#[derive(Debug, Error)]
pub enum EnumProcessError {
    /// Upload is not a well-formed spreadsheet.
    #[error("malformed spreadsheet: {0}")]
    Parse(String),
    /// A column the operation depends on is absent.
    #[error("required column missing: {column}")]
    Schema { column: String },
    /// Output workbook could not be produced.
    #[error("failed to write workbook: {0}")]
    Write(String),
    /// Processor was built with unusable options.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Internal DataFrame operation failed.
    #[error("dataframe operation failed: {0}")]
    Frame(#[from] PolarsError),
}

impl From<EnumXlsxIoError> for EnumProcessError {
    fn from(err: EnumXlsxIoError) -> Self {
        match err {
            EnumXlsxIoError::Parse(msg) => Self::Parse(msg),
            EnumXlsxIoError::Write(msg) => Self::Write(msg),
        }
    }
}

impl EnumProcessError {
    /// True when the failure is caused by the uploaded file rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Schema { .. })
    }
}

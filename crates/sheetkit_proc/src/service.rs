//! Processing service shared by all requests.

use std::time::Instant;

use polars::prelude::DataFrame;
use sheetkit_io_xlsx::{C_MIME_XLSX, SpecXlsxWriteOptions, derive_default_xlsx_write_options};
use tracing::{info, instrument, warn};

use crate::assemble::{SpecAssembledWorkbook, assemble_workbook};
use crate::error::EnumProcessError;
use crate::load::load_table;
use crate::mask::apply_identifier_masking;
use crate::split::{N_MAX_ENTRIES_PER_BATCH_DEFAULT, split_into_batches};

/// Download name of the masking result.
pub const C_DOWNLOAD_NAME_MASKING: &str = "processed_file1.xlsx";
/// Download name of the split result.
pub const C_DOWNLOAD_NAME_SPLIT: &str = "processed_file2.xlsx";

/// Transformation applied to an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumProcessMode {
    /// Validate and mask `CC_number` identifiers.
    Mask,
    /// Split debit/credit rows into interleaved batches.
    Split,
}

impl EnumProcessMode {
    pub fn download_name(self) -> &'static str {
        match self {
            Self::Mask => C_DOWNLOAD_NAME_MASKING,
            Self::Split => C_DOWNLOAD_NAME_SPLIT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Split => "split",
        }
    }
}

/// Processor options fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProcessOptions {
    /// Batch capacity of the split mode; must be >= 2.
    pub max_entries_per_batch: usize,
    /// Writer options for every output workbook.
    pub write_options: SpecXlsxWriteOptions,
}

impl Default for SpecProcessOptions {
    fn default() -> Self {
        Self {
            max_entries_per_batch: N_MAX_ENTRIES_PER_BATCH_DEFAULT,
            write_options: derive_default_xlsx_write_options(),
        }
    }
}

/// Result of one processing run, ready to send as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProcessOutput {
    pub v_bytes: Vec<u8>,
    pub download_name: &'static str,
    pub mime_type: &'static str,
    /// Data rows in the upload.
    pub n_rows_in: usize,
    /// Worksheets in the output workbook.
    pub n_sheets: usize,
}

/// Stateless processor: build once, share by reference.
#[derive(Debug, Clone, Default)]
pub struct SheetProcessor {
    options: SpecProcessOptions,
}

impl SheetProcessor {
    pub fn new(options: SpecProcessOptions) -> Result<Self, EnumProcessError> {
        if options.max_entries_per_batch < 2 {
            return Err(EnumProcessError::Config(format!(
                "max_entries_per_batch must be >= 2, got {}",
                options.max_entries_per_batch
            )));
        }
        Ok(Self { options })
    }

    /// Run `mode` over uploaded spreadsheet bytes.
    pub fn process(
        &self,
        mode: EnumProcessMode,
        v_bytes: &[u8],
    ) -> Result<SpecProcessOutput, EnumProcessError> {
        match mode {
            EnumProcessMode::Mask => self.process_masking(v_bytes),
            EnumProcessMode::Split => self.process_split(v_bytes),
        }
    }

    /// Mask identifiers; output is a single `Part_1` sheet.
    #[instrument(skip_all, fields(mode = "mask", bytes = v_bytes.len()))]
    pub fn process_masking(&self, v_bytes: &[u8]) -> Result<SpecProcessOutput, EnumProcessError> {
        let t_start = Instant::now();
        let df = load_table(v_bytes).inspect_err(log_failure)?;
        let n_rows_in = df.height();

        let df_masked = apply_identifier_masking(df).inspect_err(log_failure)?;
        let workbook = assemble_workbook(&[df_masked], &self.options.write_options)?;

        info!(
            rows = n_rows_in,
            sheets = workbook.n_sheets,
            elapsed_ms = t_start.elapsed().as_millis() as u64,
            "masking finished"
        );
        Ok(derive_output(EnumProcessMode::Mask, workbook, n_rows_in))
    }

    /// Split debit/credit rows; output has one `Part_{i}` sheet per batch.
    #[instrument(skip_all, fields(mode = "split", bytes = v_bytes.len()))]
    pub fn process_split(&self, v_bytes: &[u8]) -> Result<SpecProcessOutput, EnumProcessError> {
        let t_start = Instant::now();
        let df = load_table(v_bytes).inspect_err(log_failure)?;
        let n_rows_in = df.height();

        let mut l_batches = split_into_batches(&df, self.options.max_entries_per_batch)
            .inspect_err(log_failure)?;
        let n_batches = l_batches.len();
        if l_batches.is_empty() {
            // a workbook needs at least one sheet
            l_batches.push(derive_header_only(&df));
        }

        let workbook = assemble_workbook(&l_batches, &self.options.write_options)?;

        info!(
            rows = n_rows_in,
            batches = n_batches,
            sheets = workbook.n_sheets,
            elapsed_ms = t_start.elapsed().as_millis() as u64,
            "split finished"
        );
        Ok(derive_output(EnumProcessMode::Split, workbook, n_rows_in))
    }
}

fn derive_header_only(df: &DataFrame) -> DataFrame {
    df.head(Some(0))
}

fn derive_output(
    mode: EnumProcessMode,
    workbook: SpecAssembledWorkbook,
    n_rows_in: usize,
) -> SpecProcessOutput {
    for c_warning in &workbook.warnings {
        warn!(mode = mode.as_str(), warning = %c_warning, "workbook written with warnings");
    }
    SpecProcessOutput {
        v_bytes: workbook.v_bytes,
        download_name: mode.download_name(),
        mime_type: C_MIME_XLSX,
        n_rows_in,
        n_sheets: workbook.n_sheets,
    }
}

fn log_failure(err: &EnumProcessError) {
    if err.is_client_error() {
        warn!(error = %err, "upload rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_capacity_below_two_is_rejected() {
        let err = SheetProcessor::new(SpecProcessOptions {
            max_entries_per_batch: 1,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, EnumProcessError::Config(_)));
    }

    #[test]
    fn test_mode_download_names() {
        assert_eq!(
            EnumProcessMode::Mask.download_name(),
            "processed_file1.xlsx"
        );
        assert_eq!(
            EnumProcessMode::Split.download_name(),
            "processed_file2.xlsx"
        );
    }

    #[test]
    fn test_garbage_upload_is_parse_error() {
        let processor = SheetProcessor::default();
        let err = processor
            .process(EnumProcessMode::Split, b"\x00\x01garbage")
            .unwrap_err();
        assert!(matches!(err, EnumProcessError::Parse(_)));
        assert!(err.is_client_error());
    }
}

//! Workbook assembly: one sheet per batch.

use polars::prelude::DataFrame;
use sheetkit_io_xlsx::{SpecXlsxWriteOptions, XlsxWriter};

use crate::error::EnumProcessError;

/// Prefix of output sheet names (`Part_1`, `Part_2`, ...).
pub const C_SHEET_NAME_PREFIX: &str = "Part";

/// Serialized workbook plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAssembledWorkbook {
    pub v_bytes: Vec<u8>,
    /// Worksheets written, after any Excel-limit slicing.
    pub n_sheets: usize,
    /// Non-fatal writer warnings.
    pub warnings: Vec<String>,
}

/// Sheet name of the 1-based batch `n_idx`.
pub fn derive_batch_sheet_name(n_idx: usize) -> String {
    format!("{C_SHEET_NAME_PREFIX}_{n_idx}")
}

/// Write every batch as sheet `Part_{i}` of one xlsx workbook.
pub fn assemble_workbook(
    batches: &[DataFrame],
    write_options: &SpecXlsxWriteOptions,
) -> Result<SpecAssembledWorkbook, EnumProcessError> {
    let mut writer = XlsxWriter::new(write_options.clone());
    for (n_idx, df_batch) in batches.iter().enumerate() {
        writer.write_sheet(df_batch, &derive_batch_sheet_name(n_idx + 1))?;
    }

    let n_sheets = writer.n_sheets();
    let warnings = writer
        .report()
        .iter()
        .flat_map(|report| report.warnings.iter().cloned())
        .collect();
    let v_bytes = writer.finish()?;

    Ok(SpecAssembledWorkbook {
        v_bytes,
        n_sheets,
        warnings,
    })
}

//! Shared XLSX models: errors, cell styles, options and write reports.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region ErrorSpecification

/// Failure raised by the spreadsheet reader or writer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnumXlsxIoError {
    /// Input bytes are not a readable spreadsheet.
    #[error("malformed spreadsheet: {0}")]
    Parse(String),
    /// Workbook could not be produced.
    #[error("failed to write workbook: {0}")]
    Write(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellStyleSpecification

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCellAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style of one class of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecCellStyle {
    pub bold: bool,
    pub align: EnumCellAlign,
    /// Excel number format code, e.g. `0` or `0.00##`.
    pub num_format: Option<&'static str>,
    /// Thin rule under the cell.
    pub border_bottom: bool,
}

/// Styles used by the writer, one per cell class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCellStyles {
    pub header: SpecCellStyle,
    pub text: SpecCellStyle,
    pub integer: SpecCellStyle,
    pub decimal: SpecCellStyle,
}

/// Cell value after dtype-driven normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    None,
    String(String),
    Number(f64),
    Boolean(bool),
}

/// Writer-side classification of a column, chosen from its dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColumnKind {
    Text,
    Integer,
    Decimal,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Column width inference.
///
/// Width is the widest of the header and the first `n_rows_sampled` body
/// cells, plus padding, clamped to `[n_width_min, n_width_max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnWidthPolicy {
    pub n_rows_sampled: usize,
    pub n_width_min: usize,
    pub n_width_max: usize,
    pub n_width_padding: usize,
}

impl Default for SpecColumnWidthPolicy {
    fn default() -> Self {
        Self {
            n_rows_sampled: 1_000,
            n_width_min: 8,
            n_width_max: 60,
            n_width_padding: 2,
        }
    }
}

/// Writer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Text written for null/NaN/Inf cells; `None` leaves them blank.
    pub missing_value_text: Option<String>,
    /// Use integer/decimal styles for numeric dtypes.
    pub infer_numeric_cols: bool,
    /// Freeze panes below the header row.
    pub freeze_header: bool,
    /// `None` keeps Excel's default widths.
    pub policy_width: Option<SpecColumnWidthPolicy>,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            missing_value_text: None,
            infer_numeric_cols: true,
            freeze_header: true,
            policy_width: Some(SpecColumnWidthPolicy::default()),
        }
    }
}

/// Reader options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReadOptions {
    /// Zero-based worksheet position to load.
    pub sheet_index: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Worksheet emitted for part of a DataFrame (after Excel-limit slicing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetSlice {
    pub sheet_name: String,
    pub row_start_inclusive: usize,
    pub row_end_exclusive: usize,
    pub col_start_inclusive: usize,
    pub col_end_exclusive: usize,
}

/// Outcome of one `write_sheet` call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    pub sheets: Vec<SpecSheetSlice>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

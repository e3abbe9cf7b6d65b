//! `sheetkit_io_xlsx`:
//! Spreadsheet I/O kernel.
//!
//! - `conf`   : Excel limits and default presets
//! - `spec`   : models/options/errors
//! - `util`   : pure helper functions
//! - `reader` : calamine-backed worksheet reader
//! - `writer` : in-memory rust_xlsxwriter workbook writer
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_MIME_XLSX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    derive_default_cell_styles, derive_default_xlsx_write_options,
};
pub use reader::read_dataframe_from_bytes;
pub use spec::{
    EnumCellAlign, EnumCellValue, EnumColumnKind, EnumXlsxIoError, SpecCellStyle, SpecCellStyles,
    SpecColumnWidthPolicy, SpecSheetSlice, SpecXlsxReadOptions, SpecXlsxReport,
    SpecXlsxWriteOptions,
};
pub use util::{create_sheet_identifier, format_number_text, plan_sheet_slices, sanitize_sheet_name};
pub use writer::XlsxWriter;

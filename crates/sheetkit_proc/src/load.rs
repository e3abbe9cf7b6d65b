//! Upload loading and schema checks.

use polars::prelude::DataFrame;
use sheetkit_io_xlsx::{SpecXlsxReadOptions, read_dataframe_from_bytes};

use crate::error::EnumProcessError;

/// Parse uploaded spreadsheet bytes into a DataFrame (first worksheet, first-row header).
pub fn load_table(v_bytes: &[u8]) -> Result<DataFrame, EnumProcessError> {
    Ok(read_dataframe_from_bytes(
        v_bytes,
        &SpecXlsxReadOptions::default(),
    )?)
}

/// Fail with [`EnumProcessError::Schema`] when `name` is not a column of `df`.
pub fn require_column(df: &DataFrame, name: &str) -> Result<(), EnumProcessError> {
    if df.get_column_index(name).is_some() {
        return Ok(());
    }
    Err(EnumProcessError::Schema {
        column: name.to_string(),
    })
}

//! Spreadsheet reader: first-row-header worksheet into a DataFrame.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::spec::{EnumXlsxIoError, SpecXlsxReadOptions};
use crate::util::{derive_unique_header_names, format_number_text};

/// Largest float magnitude still treated as an integer cell.
const N_INT_CELL_ABS_MAX: f64 = 9.0e18;

/// Read one worksheet from spreadsheet bytes (xlsx/xlsm/xlsb/xls/ods).
///
/// The first row is the header. An empty workbook or sheet yields an empty
/// DataFrame.
pub fn read_dataframe_from_bytes(
    v_bytes: &[u8],
    options: &SpecXlsxReadOptions,
) -> Result<DataFrame, EnumXlsxIoError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(v_bytes))
        .map_err(|err| EnumXlsxIoError::Parse(err.to_string()))?;

    let Some(range_result) = workbook.worksheet_range_at(options.sheet_index) else {
        if options.sheet_index == 0 {
            return Ok(DataFrame::empty());
        }
        return Err(EnumXlsxIoError::Parse(format!(
            "worksheet index {} out of range",
            options.sheet_index
        )));
    };
    let range = range_result.map_err(|err| EnumXlsxIoError::Parse(err.to_string()))?;

    // the range starts at its first non-empty cell; columns keep sheet positions
    let n_col_offset = range.start().map_or(0, |(_, n_col)| n_col as usize);

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let l_headers_raw: Vec<String> = std::iter::repeat_n(String::new(), n_col_offset)
        .chain(
            header_row
                .iter()
                .map(|cell| derive_cell_text(cell).unwrap_or_default()),
        )
        .collect();
    let l_names = derive_unique_header_names(&l_headers_raw);
    let l_body: Vec<&[Data]> = rows.collect();

    let l_columns: Vec<Column> = l_names
        .iter()
        .enumerate()
        .map(|(n_idx_col, c_name)| {
            let l_cells: Vec<&Data> = l_body
                .iter()
                .map(|row| {
                    n_idx_col
                        .checked_sub(n_col_offset)
                        .and_then(|n_idx_range| row.get(n_idx_range))
                        .unwrap_or(&Data::Empty)
                })
                .collect();
            derive_column_from_cells(c_name, &l_cells)
        })
        .collect();

    debug!(
        rows = l_body.len(),
        cols = l_columns.len(),
        "worksheet loaded"
    );

    DataFrame::new(l_columns).map_err(|err| EnumXlsxIoError::Parse(err.to_string()))
}

/// Infer one column dtype from its cells.
///
/// All-integral numbers give `Int64`, other numbers `Float64`, all booleans
/// `Boolean`; anything else, including an all-empty column, is `String`.
fn derive_column_from_cells(name: &str, l_cells: &[&Data]) -> Column {
    let mut if_any_value = false;
    let mut if_all_int = true;
    let mut if_all_num = true;
    let mut if_all_bool = true;

    for cell in l_cells {
        match cell {
            Data::Empty => continue,
            Data::Int(_) => {
                if_all_bool = false;
            }
            Data::Float(x) => {
                if_all_bool = false;
                if !x.is_finite() || x.fract() != 0.0 || x.abs() > N_INT_CELL_ABS_MAX {
                    if_all_int = false;
                }
            }
            Data::Bool(_) => {
                if_all_int = false;
                if_all_num = false;
            }
            _ => {
                if_all_int = false;
                if_all_num = false;
                if_all_bool = false;
            }
        }
        if_any_value = true;
    }

    if !if_any_value {
        let l_values: Vec<Option<String>> = vec![None; l_cells.len()];
        return Column::new(name.into(), l_values);
    }

    if if_all_num && if_all_int {
        let l_values: Vec<Option<i64>> = l_cells
            .iter()
            .map(|cell| match cell {
                Data::Int(v) => Some(*v),
                Data::Float(x) => Some(*x as i64),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), l_values);
    }

    if if_all_num {
        let l_values: Vec<Option<f64>> = l_cells
            .iter()
            .map(|cell| match cell {
                Data::Int(v) => Some(*v as f64),
                Data::Float(x) => Some(*x),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), l_values);
    }

    if if_all_bool {
        let l_values: Vec<Option<bool>> = l_cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), l_values);
    }

    let l_values: Vec<Option<String>> = l_cells.iter().map(|cell| derive_cell_text(cell)).collect();
    Column::new(name.into(), l_values)
}

/// Render a cell as text the way it was typed; `None` for empty cells.
fn derive_cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(x) => Some(format_number_text(*x)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{AnyValue, DataType};
    use rust_xlsxwriter::Workbook;

    use super::*;

    fn derive_workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "CC_number").unwrap();
        worksheet.write_string(0, 1, "amount").unwrap();
        worksheet.write_string(0, 2, "type").unwrap();
        worksheet.write_string(0, 3, "flag").unwrap();

        worksheet.write_number(1, 0, 1212123412341234.0).unwrap();
        worksheet.write_number(1, 1, 10.5).unwrap();
        worksheet.write_string(1, 2, "d").unwrap();
        worksheet.write_boolean(1, 3, true).unwrap();

        worksheet.write_number(2, 0, 4545451234567890.0).unwrap();
        worksheet.write_number(2, 1, 3.0).unwrap();
        worksheet.write_string(2, 2, "c").unwrap();
        worksheet.write_boolean(2, 3, false).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_read_infers_dtypes_from_cells() {
        let df = read_dataframe_from_bytes(&derive_workbook_bytes(), &Default::default()).unwrap();

        assert_eq!(
            df.get_column_names_str(),
            vec!["CC_number", "amount", "type", "flag"]
        );
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("CC_number").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("amount").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("type").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(
            df.column("CC_number").unwrap().get(0).unwrap(),
            AnyValue::Int64(1212123412341234)
        );
    }

    #[test]
    fn test_read_rejects_non_spreadsheet_bytes() {
        let err = read_dataframe_from_bytes(b"definitely,not,a,workbook", &Default::default())
            .unwrap_err();
        assert!(matches!(err, EnumXlsxIoError::Parse(_)));
    }

    #[test]
    fn test_read_empty_sheet_gives_empty_frame() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let v_bytes = workbook.save_to_buffer().unwrap();

        let df = read_dataframe_from_bytes(&v_bytes, &Default::default()).unwrap();
        assert_eq!(df.width(), 0);
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn test_leading_empty_columns_keep_sheet_positions() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 1, "type").unwrap();
        worksheet.write_string(0, 3, "amount").unwrap();
        worksheet.write_string(1, 1, "d").unwrap();
        worksheet.write_string(1, 2, "x").unwrap();
        worksheet.write_number(1, 3, 5.0).unwrap();
        let v_bytes = workbook.save_to_buffer().unwrap();

        let df = read_dataframe_from_bytes(&v_bytes, &Default::default()).unwrap();

        assert_eq!(
            df.get_column_names_str(),
            vec!["Unnamed: 0", "type", "Unnamed: 2", "amount"]
        );
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("Unnamed: 0").unwrap().get(0).unwrap(), AnyValue::Null);
        assert_eq!(
            df.column("type").unwrap().get(0).unwrap(),
            AnyValue::String("d")
        );
        assert_eq!(
            df.column("Unnamed: 2").unwrap().get(0).unwrap(),
            AnyValue::String("x")
        );
        assert_eq!(
            df.column("amount").unwrap().get(0).unwrap(),
            AnyValue::Int64(5)
        );
    }

    #[test]
    fn test_mixed_column_falls_back_to_text() {
        let l_cells = [
            Data::Float(1234.0),
            Data::String("abc".to_string()),
            Data::Empty,
        ];
        let l_refs: Vec<&Data> = l_cells.iter().collect();
        let col = derive_column_from_cells("mixed", &l_refs);

        assert_eq!(col.dtype(), &DataType::String);
        assert_eq!(col.get(0).unwrap(), AnyValue::String("1234"));
        assert_eq!(col.get(2).unwrap(), AnyValue::Null);
    }
}

//! Identifier masking pipeline.

use polars::prelude::{AnyValue, Column, DataFrame, PolarsResult};
use sheetkit_io_xlsx::format_number_text;

use crate::error::EnumProcessError;
use crate::load::require_column;
use crate::validate::{is_correct_grouping, is_correct_length, mask_identifier};

/// Input column holding the identifiers.
pub const C_COL_IDENTIFIER: &str = "CC_number";
/// Appended 1/0 column: identifier has the expected length.
pub const C_COL_FIRST_VALIDATION: &str = "first_validation";
/// Appended 1/0 column: identifier has the expected grouping.
pub const C_COL_SECOND_VALIDATION: &str = "second_validation";
/// Appended masked identifier column (null when invalid).
pub const C_COL_MASKED: &str = "MaskedNumber";

/// Coerce `CC_number` to text and append the two validation flags and the masked value.
///
/// Rows are neither dropped nor reordered; invalid identifiers give 0/0/null.
pub fn apply_identifier_masking(mut df: DataFrame) -> Result<DataFrame, EnumProcessError> {
    require_column(&df, C_COL_IDENTIFIER)?;

    let l_texts: Vec<Option<String>> = {
        let col = df.column(C_COL_IDENTIFIER)?;
        (0..col.len())
            .map(|n_idx_row| col.get(n_idx_row).map(derive_identifier_text))
            .collect::<PolarsResult<_>>()?
    };

    let l_first: Vec<i64> = l_texts
        .iter()
        .map(|c_id| i64::from(c_id.as_deref().is_some_and(is_correct_length)))
        .collect();
    let l_second: Vec<i64> = l_texts
        .iter()
        .map(|c_id| i64::from(c_id.as_deref().is_some_and(is_correct_grouping)))
        .collect();
    let l_masked: Vec<Option<String>> = l_texts
        .iter()
        .map(|c_id| c_id.as_deref().and_then(mask_identifier))
        .collect();

    df.with_column(Column::new(C_COL_IDENTIFIER.into(), l_texts))?;
    df.with_column(Column::new(C_COL_FIRST_VALIDATION.into(), l_first))?;
    df.with_column(Column::new(C_COL_SECOND_VALIDATION.into(), l_second))?;
    df.with_column(Column::new(C_COL_MASKED.into(), l_masked))?;

    Ok(df)
}

/// Render an identifier cell as the text that was typed.
fn derive_identifier_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(val) => Some(val.to_string()),
        AnyValue::StringOwned(val) => Some(val.to_string()),
        AnyValue::Boolean(val) => Some(if val { "True" } else { "False" }.to_string()),
        AnyValue::Float32(val) => Some(format_number_text(val as f64)),
        AnyValue::Float64(val) => Some(format_number_text(val)),
        AnyValue::Int8(val) => Some(val.to_string()),
        AnyValue::Int16(val) => Some(val.to_string()),
        AnyValue::Int32(val) => Some(val.to_string()),
        AnyValue::Int64(val) => Some(val.to_string()),
        AnyValue::UInt8(val) => Some(val.to_string()),
        AnyValue::UInt16(val) => Some(val.to_string()),
        AnyValue::UInt32(val) => Some(val.to_string()),
        AnyValue::UInt64(val) => Some(val.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use super::*;

    fn derive_i64_values(df: &DataFrame, name: &str) -> Vec<i64> {
        let col = df.column(name).unwrap();
        (0..col.len())
            .map(|n_idx| match col.get(n_idx).unwrap() {
                AnyValue::Int64(v) => v,
                other => panic!("unexpected value {other:?}"),
            })
            .collect()
    }

    fn derive_text_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        let col = df.column(name).unwrap();
        (0..col.len())
            .map(|n_idx| match col.get(n_idx).unwrap() {
                AnyValue::Null => None,
                AnyValue::String(v) => Some(v.to_string()),
                AnyValue::StringOwned(v) => Some(v.to_string()),
                other => panic!("unexpected value {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_masking_appends_columns_in_order() {
        let df = DataFrame::new(vec![
            Column::new("holder".into(), ["ann", "bob", "cid", "dee"]),
            Column::new(
                "CC_number".into(),
                [
                    Some("121212341234XXXX"),
                    Some("123412341234XXXX"),
                    Some("1212"),
                    None,
                ],
            ),
        ])
        .unwrap();

        let df_out = apply_identifier_masking(df).unwrap();

        assert_eq!(
            df_out.get_column_names_str(),
            vec![
                "holder",
                "CC_number",
                "first_validation",
                "second_validation",
                "MaskedNumber"
            ]
        );
        assert_eq!(df_out.height(), 4);
        assert_eq!(derive_i64_values(&df_out, C_COL_FIRST_VALIDATION), vec![1, 1, 0, 0]);
        assert_eq!(derive_i64_values(&df_out, C_COL_SECOND_VALIDATION), vec![1, 0, 0, 0]);
        assert_eq!(
            derive_text_values(&df_out, C_COL_MASKED),
            vec![Some("121212**********".to_string()), None, None, None]
        );
        assert_eq!(
            derive_text_values(&df_out, "holder"),
            vec![
                Some("ann".to_string()),
                Some("bob".to_string()),
                Some("cid".to_string()),
                Some("dee".to_string())
            ]
        );
    }

    #[test]
    fn test_numeric_identifiers_are_coerced_to_text() {
        let df = DataFrame::new(vec![Column::new(
            "CC_number".into(),
            [1212123412341234i64, 42],
        )])
        .unwrap();

        let df_out = apply_identifier_masking(df).unwrap();

        assert_eq!(
            df_out.column(C_COL_IDENTIFIER).unwrap().dtype(),
            &DataType::String
        );
        assert_eq!(
            derive_text_values(&df_out, C_COL_IDENTIFIER),
            vec![Some("1212123412341234".to_string()), Some("42".to_string())]
        );
        assert_eq!(
            derive_text_values(&df_out, C_COL_MASKED),
            vec![Some("121212**********".to_string()), None]
        );
    }

    #[test]
    fn test_float_identifiers_keep_integral_digits() {
        assert_eq!(
            derive_identifier_text(AnyValue::Float64(1212123412341234.0)).as_deref(),
            Some("1212123412341234")
        );
        assert_eq!(derive_identifier_text(AnyValue::Null), None);
    }

    #[test]
    fn test_missing_identifier_column_is_schema_error() {
        let df = DataFrame::new(vec![Column::new("number".into(), ["x"])]).unwrap();
        let err = apply_identifier_masking(df).unwrap_err();
        assert!(matches!(err, EnumProcessError::Schema { column } if column == "CC_number"));
    }

    #[test]
    fn test_empty_frame_with_identifier_column() {
        let l_empty: Vec<Option<String>> = vec![];
        let df = DataFrame::new(vec![Column::new("CC_number".into(), l_empty)]).unwrap();
        let df_out = apply_identifier_masking(df).unwrap();
        assert_eq!(df_out.height(), 0);
        assert_eq!(df_out.width(), 4);
    }
}

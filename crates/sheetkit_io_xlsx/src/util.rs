//! Pure helpers shared by the reader and writer.

use std::collections::BTreeSet;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, EnumColumnKind, SpecSheetSlice, SpecXlsxReport};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize a cell for writing.
///
/// Null and non-finite numbers become `missing_value_text` (or blank).
/// Numbers in text columns become strings.
pub fn convert_cell_value(
    value: EnumCellValue,
    kind: EnumColumnKind,
    missing_value_text: Option<&str>,
) -> EnumCellValue {
    let derive_missing = || match missing_value_text {
        Some(c_text) => EnumCellValue::String(c_text.to_string()),
        None => EnumCellValue::None,
    };
    match value {
        EnumCellValue::None => derive_missing(),
        EnumCellValue::Number(x) if !x.is_finite() => derive_missing(),
        EnumCellValue::Number(x) if kind == EnumColumnKind::Text => {
            EnumCellValue::String(format_number_text(x))
        }
        other => other,
    }
}

/// Render a number as text, dropping the `.0` of integral values.
pub fn format_number_text(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e18 {
        return format!("{}", x as i64);
    }
    x.to_string()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Turn raw header texts into unique column names.
///
/// Blank headers become `Unnamed: {idx}`; repeats get `.1`, `.2`, ... suffixes.
pub fn derive_unique_header_names(raw_headers: &[String]) -> Vec<String> {
    let mut set_taken: BTreeSet<String> = BTreeSet::new();
    raw_headers
        .iter()
        .enumerate()
        .map(|(n_idx, c_raw)| {
            let c_base = if c_raw.trim().is_empty() {
                format!("Unnamed: {n_idx}")
            } else {
                c_raw.clone()
            };
            let mut c_name = c_base.clone();
            let mut n_dup = 0usize;
            while set_taken.contains(&c_name) {
                n_dup += 1;
                c_name = format!("{c_base}.{n_dup}");
            }
            set_taken.insert(c_name.clone());
            c_name
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace characters Excel rejects and cap the length.
pub fn sanitize_sheet_name(name: &str) -> String {
    let c_name: String = name
        .chars()
        .map(|chr| if TUP_EXCEL_ILLEGAL.contains(&chr) { '_' } else { chr })
        .collect();
    let c_name = c_name.trim();
    if c_name.is_empty() {
        return "Sheet".to_string();
    }
    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Suffixed sheet name `base_{idx}`, shortening `base` to fit the length cap.
pub fn create_sheet_identifier(base_name: &str, part_idx_1based: usize) -> String {
    let c_suffix = format!("_{part_idx_1based}");
    let n_len_base_max = N_LEN_EXCEL_SHEET_NAME_MAX.saturating_sub(c_suffix.len());
    let c_base: String = base_name.chars().take(n_len_base_max.max(1)).collect();
    format!("{c_base}{c_suffix}")
}

/// Cut `[0, n_total)` into spans of at most `n_step`; always at least one span.
fn derive_spans(n_total: usize, n_step: usize) -> Vec<(usize, usize)> {
    if n_total == 0 {
        return vec![(0, 0)];
    }
    (0..n_total)
        .step_by(n_step)
        .map(|n_start| (n_start, usize::min(n_total, n_start + n_step)))
        .collect()
}

/// Split a `height_df` x `width_df` frame into sheets that fit Excel limits.
///
/// A frame that fits keeps `sheet_name`; otherwise parts are named
/// `{sheet_name}_1`, `{sheet_name}_2`, ... column block first, then rows.
pub fn plan_sheet_slices(
    height_df: usize,
    width_df: usize,
    sheet_name: &str,
    report: &mut SpecXlsxReport,
) -> Vec<SpecSheetSlice> {
    // row 0 is the header
    let l_row_spans = derive_spans(height_df, N_NROWS_EXCEL_MAX - 1);
    let l_col_spans = derive_spans(width_df, N_NCOLS_EXCEL_MAX);
    let if_split = l_row_spans.len() * l_col_spans.len() > 1;

    let l_slices: Vec<SpecSheetSlice> = l_col_spans
        .iter()
        .flat_map(|&(n_col_start, n_col_end)| {
            l_row_spans
                .iter()
                .map(move |&(n_row_start, n_row_end)| (n_row_start, n_row_end, n_col_start, n_col_end))
        })
        .enumerate()
        .map(|(n_idx, (n_row_start, n_row_end, n_col_start, n_col_end))| SpecSheetSlice {
            sheet_name: if if_split {
                create_sheet_identifier(sheet_name, n_idx + 1)
            } else {
                sheet_name.to_string()
            },
            row_start_inclusive: n_row_start,
            row_end_exclusive: n_row_end,
            col_start_inclusive: n_col_start,
            col_end_exclusive: n_col_end,
        })
        .collect();

    if if_split {
        report.warn(format!(
            "sheet {sheet_name:?} exceeds Excel limits, written as {} sheets",
            l_slices.len()
        ));
    }
    l_slices
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("a/b:c"), "a_b_c");
        assert_eq!(sanitize_sheet_name("   "), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_create_sheet_identifier_respects_length_cap() {
        assert_eq!(create_sheet_identifier("Part_3", 2), "Part_3_2");
        let c_name = create_sheet_identifier(&"y".repeat(31), 12);
        assert_eq!(c_name.chars().count(), 31);
        assert!(c_name.ends_with("_12"));
    }

    #[test]
    fn test_plan_sheet_slices_single_part_keeps_name() {
        let mut report = SpecXlsxReport::default();
        let l_parts = plan_sheet_slices(12, 3, "Part_1", &mut report);
        assert_eq!(l_parts.len(), 1);
        assert_eq!(l_parts[0].sheet_name, "Part_1");
        assert_eq!(l_parts[0].row_end_exclusive, 12);
        assert_eq!(l_parts[0].col_end_exclusive, 3);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_plan_sheet_slices_row_overflow() {
        let mut report = SpecXlsxReport::default();
        let l_parts = plan_sheet_slices(N_NROWS_EXCEL_MAX + 10, 2, "Part_3", &mut report);
        assert_eq!(l_parts.len(), 2);
        assert_eq!(l_parts[0].sheet_name, "Part_3_1");
        assert_eq!(l_parts[0].row_end_exclusive, N_NROWS_EXCEL_MAX - 1);
        assert_eq!(l_parts[1].sheet_name, "Part_3_2");
        assert_eq!(l_parts[1].row_start_inclusive, N_NROWS_EXCEL_MAX - 1);
        assert_eq!(l_parts[1].row_end_exclusive, N_NROWS_EXCEL_MAX + 10);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_plan_sheet_slices_empty_frame_still_emits_one_sheet() {
        let mut report = SpecXlsxReport::default();
        let l_parts = plan_sheet_slices(0, 0, "Part_1", &mut report);
        assert_eq!(l_parts.len(), 1);
        assert_eq!(l_parts[0].row_end_exclusive, 0);
        assert_eq!(l_parts[0].col_end_exclusive, 0);
    }

    #[test]
    fn test_derive_unique_header_names() {
        let l_raw: Vec<String> = ["type", "", "type", "type", "type.1"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            derive_unique_header_names(&l_raw),
            vec!["type", "Unnamed: 1", "type.1", "type.2", "type.1.1"]
        );
    }

    #[test]
    fn test_convert_cell_value_numbers_in_text_columns() {
        assert_eq!(
            convert_cell_value(EnumCellValue::Number(42.0), EnumColumnKind::Text, None),
            EnumCellValue::String("42".to_string())
        );
        assert_eq!(
            convert_cell_value(EnumCellValue::Number(42.0), EnumColumnKind::Integer, None),
            EnumCellValue::Number(42.0)
        );
    }

    #[test]
    fn test_convert_cell_value_missing_text() {
        assert_eq!(
            convert_cell_value(EnumCellValue::None, EnumColumnKind::Text, Some("NA")),
            EnumCellValue::String("NA".to_string())
        );
        assert_eq!(
            convert_cell_value(EnumCellValue::Number(f64::NAN), EnumColumnKind::Decimal, None),
            EnumCellValue::None
        );
    }

    #[test]
    fn test_format_number_text() {
        assert_eq!(format_number_text(1212123412341234.0), "1212123412341234");
        assert_eq!(format_number_text(12.5), "12.5");
    }
}

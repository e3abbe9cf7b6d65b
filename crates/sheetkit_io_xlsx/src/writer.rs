//! In-memory workbook writer: each DataFrame becomes one or more worksheets.

use std::collections::BTreeSet;
use std::fmt::Display;

use polars::prelude::{AnyValue, Column, DataFrame};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, warn};

use crate::conf::{
    N_INT_EXACT_F64_MAX, derive_default_cell_styles, derive_default_xlsx_write_options,
};
use crate::spec::{
    EnumCellAlign, EnumCellValue, EnumColumnKind, EnumXlsxIoError, SpecCellStyle, SpecCellStyles,
    SpecColumnWidthPolicy, SpecSheetSlice, SpecXlsxReport, SpecXlsxWriteOptions,
};
use crate::util::{
    convert_cell_value, create_sheet_identifier, format_number_text, plan_sheet_slices,
    sanitize_sheet_name,
};

/// Buffers sheets in a workbook; [`Self::finish`] serializes it.
pub struct XlsxWriter {
    workbook: Workbook,
    styles: SpecCellStyles,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new(derive_default_xlsx_write_options())
    }
}

impl XlsxWriter {
    pub fn new(write_options: SpecXlsxWriteOptions) -> Self {
        Self {
            workbook: Workbook::new(),
            styles: derive_default_cell_styles(),
            write_options,
            set_sheet_names: BTreeSet::new(),
            l_reports: Vec::new(),
        }
    }

    /// Per-call write reports, in write order.
    pub fn report(&self) -> &[SpecXlsxReport] {
        &self.l_reports
    }

    /// Worksheets emitted so far.
    pub fn n_sheets(&self) -> usize {
        self.l_reports.iter().map(|report| report.sheets.len()).sum()
    }

    pub fn finish(mut self) -> Result<Vec<u8>, EnumXlsxIoError> {
        for c_warning in self.l_reports.iter().flat_map(|report| &report.warnings) {
            warn!(warning = %c_warning, "xlsx writer warning");
        }
        self.workbook.save_to_buffer().map_err(derive_write_error)
    }

    /// Write `df` as sheet `sheet_name`: header row of column names, no index column.
    ///
    /// Frames beyond Excel limits spill into `{sheet_name}_1`, `{sheet_name}_2`, ...
    /// A name already used in this workbook gets a numeric suffix.
    pub fn write_sheet(&mut self, df: &DataFrame, sheet_name: &str) -> Result<(), EnumXlsxIoError> {
        if let Some(policy) = &self.write_options.policy_width {
            validate_width_policy(policy)?;
        }

        let l_kinds: Vec<EnumColumnKind> = if self.write_options.infer_numeric_cols {
            df.get_columns().iter().map(derive_column_kind).collect()
        } else {
            vec![EnumColumnKind::Text; df.width()]
        };
        let formats = SpecSheetFormats::from_styles(&self.styles);

        let mut report = SpecXlsxReport::default();
        let l_slices = plan_sheet_slices(
            df.height(),
            df.width(),
            &sanitize_sheet_name(sheet_name),
            &mut report,
        );

        for slice in l_slices {
            let c_name = self.claim_sheet_name(&slice.sheet_name);
            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(&c_name).map_err(derive_write_error)?;
            write_slice(worksheet, df, &slice, &l_kinds, &formats, &self.write_options)?;

            debug!(
                sheet = %c_name,
                rows = slice.row_end_exclusive - slice.row_start_inclusive,
                cols = slice.col_end_exclusive - slice.col_start_inclusive,
                "worksheet written"
            );
            report.sheets.push(SpecSheetSlice {
                sheet_name: c_name,
                ..slice
            });
        }

        self.l_reports.push(report);
        Ok(())
    }

    fn claim_sheet_name(&mut self, name: &str) -> String {
        let mut c_name = name.to_string();
        let mut n_idx = 1usize;
        while self.set_sheet_names.contains(&c_name) {
            n_idx += 1;
            c_name = create_sheet_identifier(name, n_idx);
        }
        self.set_sheet_names.insert(c_name.clone());
        c_name
    }
}

/// Resolved `rust_xlsxwriter` formats of one write call.
struct SpecSheetFormats {
    header: Format,
    text: Format,
    integer: Format,
    decimal: Format,
}

impl SpecSheetFormats {
    fn from_styles(styles: &SpecCellStyles) -> Self {
        Self {
            header: derive_xlsx_format(&styles.header),
            text: derive_xlsx_format(&styles.text),
            integer: derive_xlsx_format(&styles.integer),
            decimal: derive_xlsx_format(&styles.decimal),
        }
    }

    fn for_kind(&self, kind: EnumColumnKind) -> &Format {
        match kind {
            EnumColumnKind::Text => &self.text,
            EnumColumnKind::Integer => &self.integer,
            EnumColumnKind::Decimal => &self.decimal,
        }
    }
}

fn write_slice(
    worksheet: &mut Worksheet,
    df: &DataFrame,
    slice: &SpecSheetSlice,
    l_kinds: &[EnumColumnKind],
    formats: &SpecSheetFormats,
    write_options: &SpecXlsxWriteOptions,
) -> Result<(), EnumXlsxIoError> {
    let l_columns = &df.get_columns()[slice.col_start_inclusive..slice.col_end_exclusive];
    let l_kinds = &l_kinds[slice.col_start_inclusive..slice.col_end_exclusive];
    let c_missing = write_options.missing_value_text.as_deref();
    let n_rows_sampled = write_options
        .policy_width
        .as_ref()
        .map_or(0, |policy| policy.n_rows_sampled);

    for (n_idx_col, (col, kind)) in l_columns.iter().zip(l_kinds).enumerate() {
        let n_col = cast_col_num(n_idx_col)?;
        worksheet
            .write_string_with_format(0, n_col, col.name().as_str(), &formats.header)
            .map_err(derive_write_error)?;
        let mut n_width = estimate_text_width(col.name());

        let format = formats.for_kind(*kind);
        for (n_row_local, n_row_src) in
            (slice.row_start_inclusive..slice.row_end_exclusive).enumerate()
        {
            let value = convert_cell_value(
                derive_cell_value(col.get(n_row_src).map_err(derive_write_error)?),
                *kind,
                c_missing,
            );
            if n_row_local < n_rows_sampled {
                n_width = n_width.max(estimate_value_width(&value));
            }
            write_cell(worksheet, cast_row_num(n_row_local + 1)?, n_col, &value, format)?;
        }

        if let Some(policy) = &write_options.policy_width {
            let n_width_final =
                (n_width + policy.n_width_padding).clamp(policy.n_width_min, policy.n_width_max);
            worksheet
                .set_column_width(n_col, n_width_final as f64)
                .map_err(derive_write_error)?;
        }
    }

    if write_options.freeze_header && !l_columns.is_empty() {
        worksheet.set_freeze_panes(1, 0).map_err(derive_write_error)?;
    }
    Ok(())
}

fn validate_width_policy(policy: &SpecColumnWidthPolicy) -> Result<(), EnumXlsxIoError> {
    if policy.n_width_min == 0 || policy.n_width_max < policy.n_width_min || policy.n_width_max > 255
    {
        return Err(EnumXlsxIoError::Write(format!(
            "column width bounds must satisfy 1 <= min <= max <= 255, got [{}, {}]",
            policy.n_width_min, policy.n_width_max
        )));
    }
    Ok(())
}

fn derive_column_kind(col: &Column) -> EnumColumnKind {
    let dtype = col.dtype();
    if dtype.is_integer() {
        EnumColumnKind::Integer
    } else if dtype.is_float() {
        EnumColumnKind::Decimal
    } else {
        EnumColumnKind::Text
    }
}

fn derive_cell_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::Boolean(b) => EnumCellValue::Boolean(b),
        AnyValue::String(s) => EnumCellValue::String(s.to_string()),
        AnyValue::StringOwned(s) => EnumCellValue::String(s.to_string()),
        AnyValue::Int8(v) => EnumCellValue::Number(v.into()),
        AnyValue::Int16(v) => EnumCellValue::Number(v.into()),
        AnyValue::Int32(v) => EnumCellValue::Number(v.into()),
        AnyValue::Int64(v) => derive_integer_cell(v.into()),
        AnyValue::UInt8(v) => EnumCellValue::Number(v.into()),
        AnyValue::UInt16(v) => EnumCellValue::Number(v.into()),
        AnyValue::UInt32(v) => EnumCellValue::Number(v.into()),
        AnyValue::UInt64(v) => derive_integer_cell(v.into()),
        AnyValue::Float32(x) => EnumCellValue::Number(x.into()),
        AnyValue::Float64(x) => EnumCellValue::Number(x),
        other => EnumCellValue::String(other.to_string()),
    }
}

/// Integers an f64 cannot hold exactly become text.
fn derive_integer_cell(v: i128) -> EnumCellValue {
    if v.unsigned_abs() > N_INT_EXACT_F64_MAX as u128 {
        return EnumCellValue::String(v.to_string());
    }
    EnumCellValue::Number(v as f64)
}

fn write_cell(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), EnumXlsxIoError> {
    match value {
        EnumCellValue::None => worksheet.write_blank(n_row, n_col, format),
        EnumCellValue::String(s) => worksheet.write_string_with_format(n_row, n_col, s, format),
        EnumCellValue::Number(x) => worksheet.write_number_with_format(n_row, n_col, *x, format),
        EnumCellValue::Boolean(b) => worksheet.write_boolean_with_format(n_row, n_col, *b, format),
    }
    .map_err(derive_write_error)?;
    Ok(())
}

fn derive_xlsx_format(style: &SpecCellStyle) -> Format {
    let align = match style.align {
        EnumCellAlign::Left => FormatAlign::Left,
        EnumCellAlign::Center => FormatAlign::Center,
        EnumCellAlign::Right => FormatAlign::Right,
    };
    let mut format = Format::new()
        .set_align(align)
        .set_align(FormatAlign::VerticalCenter);
    if style.bold {
        format = format.set_bold();
    }
    if let Some(c_num_format) = style.num_format {
        format = format.set_num_format(c_num_format);
    }
    if style.border_bottom {
        format = format.set_border_bottom(FormatBorder::Thin);
    }
    format
}

/// Display width in character cells; non-ASCII glyphs count double.
fn estimate_text_width(s: &str) -> usize {
    s.chars().map(|chr| if chr.is_ascii() { 1 } else { 2 }).sum()
}

fn estimate_value_width(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_text_width(s),
        EnumCellValue::Number(x) => format_number_text(*x).len(),
        EnumCellValue::Boolean(b) => if *b { 4 } else { 5 },
    }
}

fn cast_row_num(value: usize) -> Result<u32, EnumXlsxIoError> {
    u32::try_from(value).map_err(|_| EnumXlsxIoError::Write(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, EnumXlsxIoError> {
    u16::try_from(value)
        .map_err(|_| EnumXlsxIoError::Write(format!("column index overflow: {value}")))
}

fn derive_write_error(err: impl Display) -> EnumXlsxIoError {
    EnumXlsxIoError::Write(err.to_string())
}

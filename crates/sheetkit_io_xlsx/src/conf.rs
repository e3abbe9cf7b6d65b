//! Excel limits and default presets.

use crate::spec::{EnumCellAlign, SpecCellStyle, SpecCellStyles, SpecXlsxWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];
/// Largest integer magnitude an Excel number cell stores without losing digits.
pub const N_INT_EXACT_F64_MAX: i64 = 1 << 53;

/// MIME type of an `.xlsx` download.
pub const C_MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Bold centered header over left text and right-aligned numbers.
pub fn derive_default_cell_styles() -> SpecCellStyles {
    let style_number = SpecCellStyle {
        align: EnumCellAlign::Right,
        ..Default::default()
    };
    SpecCellStyles {
        header: SpecCellStyle {
            bold: true,
            align: EnumCellAlign::Center,
            border_bottom: true,
            ..Default::default()
        },
        text: SpecCellStyle::default(),
        integer: SpecCellStyle {
            num_format: Some("0"),
            ..style_number.clone()
        },
        decimal: SpecCellStyle {
            num_format: Some("0.00##"),
            ..style_number
        },
    }
}

pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles() {
        let styles = derive_default_cell_styles();
        assert!(styles.header.bold);
        assert_eq!(styles.integer.num_format, Some("0"));
        assert_eq!(styles.decimal.align, EnumCellAlign::Right);
        assert_eq!(styles.text.num_format, None);
    }
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::model::ControlRecord;

pub(crate) const REPORT_COLUMNS: [&str; 10] = [
    "Section's Number",
    "Section",
    "Control's Number",
    "Control",
    "Profile Applicability",
    "Description",
    "Rationale",
    "Impact",
    "Audit",
    "Remediation",
];

const BASELINE_FILL: Color = Color::RGB(0xD3D3D3);
const TIER1_FILL: Color = Color::RGB(0xC6EFCE);
const TIER2_FILL: Color = Color::RGB(0xBDD7EE);

pub(crate) fn derive_report_path(pdf_path: &Path) -> PathBuf {
    replace_suffix(pdf_path, ".pdf", "_controls.xlsx")
}

pub(crate) fn derive_styled_path(report_path: &Path) -> PathBuf {
    replace_suffix(report_path, ".xlsx", "_controls.xlsx")
}

fn replace_suffix(path: &Path, suffix: &str, replacement: &str) -> PathBuf {
    let raw = path.to_string_lossy();
    match raw.strip_suffix(suffix) {
        Some(stem) => PathBuf::from(format!("{stem}{replacement}")),
        None => PathBuf::from(format!("{raw}{replacement}")),
    }
}

pub(crate) fn profile_fill(profile: &str) -> Option<Color> {
    let value = profile.trim().to_ascii_uppercase();
    if value.contains("BL") {
        Some(BASELINE_FILL)
    } else if value.contains("L1") {
        Some(TIER1_FILL)
    } else if value.contains("L2") {
        Some(TIER2_FILL)
    } else {
        None
    }
}

pub(crate) fn write_report(path: &Path, records: &[ControlRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), records, false)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to save report {}", path.display()))?;

    Ok(())
}

pub(crate) fn write_styled_report(path: &Path, records: &[ControlRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), records, true)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to save styled report {}", path.display()))?;

    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, records: &[ControlRecord], styled: bool) -> Result<()> {
    let header_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_font_color(Color::Black);

    for (column, name) in REPORT_COLUMNS.iter().enumerate() {
        let column = column as u16;
        if styled {
            worksheet.write_string_with_format(0, column, *name, &header_format)?;
        } else {
            worksheet.write_string(0, column, *name)?;
        }
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        let fill = if styled {
            record
                .profile_applicability
                .as_deref()
                .and_then(profile_fill)
        } else {
            None
        };
        let row_format = fill.map(|color| Format::new().set_background_color(color));

        for (column, value) in record.column_values().iter().enumerate() {
            let column = column as u16;
            match row_format.as_ref() {
                Some(format) => {
                    worksheet.write_string_with_format(row, column, *value, format)?;
                }
                None => {
                    worksheet.write_string(row, column, *value)?;
                }
            }
        }
    }

    Ok(())
}

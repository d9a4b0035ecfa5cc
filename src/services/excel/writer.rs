use super::types::{CellValue, Row};
use crate::error::AppError;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Table, TableColumn, TableStyle, Workbook, Worksheet,
};
use std::collections::HashSet;

pub const OUTPUT_SHEET_NAME: &str = "Cleaned";
pub const OUTPUT_TABLE_NAME: &str = "CleanedTable";

const WIDTH_SEED: usize = 10;
const WIDTH_PADDING: usize = 2;
const WIDTH_MIN: usize = 12;
const WIDTH_MAX: usize = 60;

pub struct ExcelWriter;

impl ExcelWriter {
    /// Writes cleaned rows as a styled Excel table and returns the file bytes.
    ///
    /// Headers come from the first row; later rows are laid out in that order.
    pub fn write_cleaned_workbook(&self, rows: &[Row]) -> Result<Vec<u8>, AppError> {
        let start = std::time::Instant::now();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(OUTPUT_SHEET_NAME)?;

        let headers: Vec<String> = rows
            .first()
            .map(|row| row.keys().map(str::to_string).collect())
            .unwrap_or_default();

        if !headers.is_empty() {
            let grid = layout_rows(&headers, rows);
            let titles = table_headers(&headers);
            write_table(worksheet, &titles, &grid)?;
            for (col_idx, width) in column_widths(&titles, &grid).into_iter().enumerate() {
                worksheet.set_column_width(cast_col_num(col_idx)?, width as f64)?;
            }
        }

        let bytes = workbook.save_to_buffer()?;
        tracing::info!(
            "Wrote {} rows x {} columns ({}KB) in {:?}",
            rows.len(),
            headers.len(),
            bytes.len() / 1024,
            start.elapsed()
        );
        Ok(bytes)
    }
}

fn layout_rows<'a>(headers: &[String], rows: &'a [Row]) -> Vec<Vec<&'a CellValue>> {
    static EMPTY: CellValue = CellValue::Empty;
    rows.iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(header).unwrap_or(&EMPTY))
                .collect()
        })
        .collect()
}

/// Table column titles. Excel rejects a table whose headers repeat ignoring
/// case, so later repeats get a `_2`, `_3`, ... suffix and blanks get `Column<n>`.
pub fn table_headers(headers: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("Column{}", idx + 1)
            } else {
                header.clone()
            };
            let mut title = base.clone();
            let mut suffix = 2;
            while !taken.insert(title.to_lowercase()) {
                title = format!("{base}_{suffix}");
                suffix += 1;
            }
            title
        })
        .collect()
}

fn cell_format() -> Format {
    Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::Black)
}

fn write_table(
    worksheet: &mut Worksheet,
    headers: &[String],
    grid: &[Vec<&CellValue>],
) -> Result<(), AppError> {
    let format = cell_format();

    let columns: Vec<TableColumn> = headers
        .iter()
        .map(|header| {
            TableColumn::new()
                .set_header(header)
                .set_header_format(&format)
        })
        .collect();

    let table = Table::new()
        .set_name(OUTPUT_TABLE_NAME)
        .set_style(TableStyle::Medium2)
        .set_banded_rows(true)
        .set_banded_columns(false)
        .set_autofilter(true)
        .set_total_row(false)
        .set_columns(&columns);

    for (row_idx, cells) in grid.iter().enumerate() {
        let row_num = cast_row_num(row_idx + 1)?;
        for (col_idx, value) in cells.iter().enumerate() {
            write_cell(worksheet, row_num, cast_col_num(col_idx)?, value, &format)?;
        }
    }

    let last_row = cast_row_num(grid.len())?;
    let last_col = cast_col_num(headers.len() - 1)?;
    worksheet.add_table(0, 0, last_row, last_col, &table)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), AppError> {
    match value {
        CellValue::Empty => {
            worksheet.write_blank(row, col, format)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number_with_format(row, col, *i as f64, format)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number_with_format(row, col, *f, format)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        CellValue::DateTime(dt) => {
            let text = super::utils::format_date(dt.date());
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        CellValue::Text(s) | CellValue::Error(s) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
    }
    Ok(())
}

/// Longest rendered line per column, padded and clamped to `[12, 60]`.
pub fn column_widths(headers: &[String], grid: &[Vec<&CellValue>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(col_idx, header)| {
            let body = grid
                .iter()
                .filter_map(|cells| cells.get(col_idx))
                .map(|value| display_text(value));
            let longest = std::iter::once(header.clone())
                .chain(body)
                .filter(|text| !text.is_empty())
                .flat_map(|text| {
                    text.lines()
                        .map(|line| line.chars().count())
                        .collect::<Vec<_>>()
                })
                .fold(WIDTH_SEED, usize::max);
            (longest + WIDTH_PADDING).clamp(WIDTH_MIN, WIDTH_MAX)
        })
        .collect()
}

fn display_text(value: &CellValue) -> String {
    match value {
        CellValue::DateTime(dt) => super::utils::format_date(dt.date()),
        other => other.to_string(),
    }
}

fn cast_row_num(value: usize) -> Result<u32, AppError> {
    u32::try_from(value).map_err(|_| AppError::WorkbookWrite(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> Result<u16, AppError> {
    u16::try_from(value)
        .map_err(|_| AppError::WorkbookWrite(format!("column index overflow: {value}")))
}

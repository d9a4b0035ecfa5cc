use super::types::{CellValue, Row};
use crate::error::AppError;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;

pub struct ExcelReader;

impl ExcelReader {
    /// Reads `sheet_name` into header-keyed rows, skipping rows with no content.
    pub fn read_sheet(&self, file_data: &[u8], sheet_name: &str) -> Result<Vec<Row>, AppError> {
        let start = std::time::Instant::now();
        let cursor = Cursor::new(file_data);

        let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor).map_err(|e| {
            tracing::error!("Failed to open Excel file: {}", e);
            AppError::WorkbookRead(format!("{}", e))
        })?;

        let sheet_names = workbook.sheet_names();
        tracing::debug!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);
        if !sheet_names.iter().any(|name| name == sheet_name) {
            return Err(AppError::SheetNotFound(sheet_name.to_string()));
        }

        let range = workbook.worksheet_range(sheet_name).map_err(|e| {
            tracing::error!("Failed to read worksheet {}: {}", sheet_name, e);
            AppError::WorkbookRead(format!("{}", e))
        })?;

        let rows = rows_from_range(&range);
        tracing::info!(
            "Read {} data rows from sheet {} in {:?}",
            rows.len(),
            sheet_name,
            start.elapsed()
        );

        if rows.is_empty() {
            return Err(AppError::EmptySheet);
        }
        Ok(rows)
    }
}

/// Worksheet row 1 is the header. The range may start below or right of A1,
/// so positions are resolved against absolute sheet coordinates.
fn rows_from_range(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let grid: Vec<&[Data]> = range.rows().collect();
    let width = range.width();

    let (header_cells, body): (Option<&[Data]>, &[&[Data]]) = if start_row == 0 {
        match grid.split_first() {
            Some((first, rest)) => (Some(*first), rest),
            None => (None, &[]),
        }
    } else {
        (None, &grid[..])
    };

    let headers: Vec<String> = (0..width)
        .map(|idx| {
            let text = header_cells
                .and_then(|cells| cells.get(idx))
                .map(header_text)
                .unwrap_or_default();
            if text.is_empty() {
                format!("col{}", start_col as usize + idx + 1)
            } else {
                text
            }
        })
        .collect();

    body.iter()
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = cells.get(idx).map(normalize_cell).unwrap_or_default();
                    (header.as_str(), value)
                })
                .collect::<Row>()
        })
        .filter(|row| !row.is_blank())
        .collect()
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => normalize_cell(other).to_string(),
    }
}

pub fn normalize_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

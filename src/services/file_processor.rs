use crate::error::AppError;
use crate::services::excel::{clean_rows, CleanedExport, ExcelReader, ExcelWriter};
use bytes::Bytes;

const XLSX_EXTENSION: &str = ".xlsx";

/// Caller-supplied knobs for one clean run. Blank values fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub sheet_name: Option<String>,
    pub output_name: Option<String>,
}

/// Options after defaults have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub sheet_name: String,
    pub output_name: String,
}

impl CleanOptions {
    pub fn resolve(&self, default_sheet: &str, default_output: &str) -> ResolvedOptions {
        let sheet_name = self
            .sheet_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(default_sheet)
            .to_string();

        let output_name = self
            .output_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(default_output);

        ResolvedOptions {
            sheet_name,
            output_name: ensure_xlsx_extension(output_name),
        }
    }
}

pub fn ensure_xlsx_extension(name: &str) -> String {
    let name = name.trim();
    if name.to_lowercase().ends_with(XLSX_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, XLSX_EXTENSION)
    }
}

/// Read, reshape and re-emit a workbook. CPU-bound; call off the async runtime.
pub fn clean_workbook(file_data: &[u8], options: &ResolvedOptions) -> Result<CleanedExport, AppError> {
    let start = std::time::Instant::now();

    let rows = ExcelReader.read_sheet(file_data, &options.sheet_name)?;
    let cleaned = clean_rows(&rows);
    tracing::info!("Cleaned {} rows in {:?}", cleaned.len(), start.elapsed());

    let bytes = ExcelWriter.write_cleaned_workbook(&cleaned)?;
    tracing::info!(
        "Clean export {} completed in {:?}",
        options.output_name,
        start.elapsed()
    );

    Ok(CleanedExport {
        file_name: options.output_name.clone(),
        bytes,
        row_count: cleaned.len(),
    })
}

pub async fn clean_export(file_data: Option<Bytes>, options: ResolvedOptions) -> Result<CleanedExport, AppError> {
    let file_data = file_data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Please choose an Excel file (.xlsx).".to_string()))?;

    tracing::info!(
        "Cleaning upload of {}KB from sheet {}",
        file_data.len() / 1024,
        options.sheet_name
    );

    tokio::task::spawn_blocking(move || clean_workbook(&file_data, &options))
        .await
        .map_err(|e| AppError::Internal(format!("clean task failed: {}", e)))?
}

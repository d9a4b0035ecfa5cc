pub mod cleaner;
pub mod reader;
pub mod types;
pub mod utils;
pub mod writer;

pub use cleaner::{clean_row, clean_rows};
pub use reader::ExcelReader;
pub use types::{CellValue, CleanedExport, Row};
pub use writer::ExcelWriter;

#[cfg(test)]
pub(crate) mod test_support {
    use rust_xlsxwriter::Workbook;

    /// Builds an in-memory xlsx with one sheet of string cells; empty strings
    /// are left unwritten.
    pub fn workbook_bytes(sheet_name: &str, grid: &[Vec<&str>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name).unwrap();
        for (row_idx, cells) in grid.iter().enumerate() {
            for (col_idx, value) in cells.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, *value)
                    .unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }
}

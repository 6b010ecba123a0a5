pub mod calamine_loader;
pub mod cell;
pub mod csv_loader;
pub mod workbook;

pub use cell::{extract_text, RawCell};
pub use workbook::{Grid, Workbook, WorkbookError, Worksheet};

use std::path::Path;

/// Выбирает загрузчик по расширению файла
pub fn load_workbook(path: &Path) -> Result<Workbook, WorkbookError> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => calamine_loader::load(path),
        "csv" => csv_loader::load(path),
        other => Err(WorkbookError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let result = load_workbook(Path::new("payroll.pdf"));
        assert!(matches!(result, Err(WorkbookError::UnsupportedFormat(ext)) if ext == "pdf"));
    }
}

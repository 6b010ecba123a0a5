use std::borrow::Cow;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use super::cell::RawCell;
use super::workbook::{Grid, Workbook, WorkbookError, Worksheet};

/// CSV читается как книга из одного листа с текстовыми ячейками.
///
/// Поля, которые не являются UTF-8, декодируются как Windows-1252: так
/// сохраняются однобайтовые глифы Preeti (¡, ˆ, ‰ ...). Нечитаемая запись
/// становится ошибкой одной строки, остальные строки файла загружаются.
pub fn load(path: &Path) -> Result<Workbook, WorkbookError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| WorkbookError::Open(e.to_string()))?;

    let sheet_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    Ok(Workbook::from_grids(vec![read_grid(sheet_name, reader)]))
}

fn read_grid<R: std::io::Read>(sheet_name: String, mut reader: csv::Reader<R>) -> Grid {
    let mut grid = Grid::new(sheet_name, Vec::new());
    for record in reader.byte_records() {
        match record {
            Ok(record) => grid.push_row(
                record
                    .iter()
                    .map(|field| RawCell::from(decode_field(field).as_ref()))
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!("CSV record skipped in '{}': {}", grid.name(), e);
                let stop = matches!(e.kind(), csv::ErrorKind::Io(_));
                grid.push_broken_row(e.to_string());
                if stop {
                    break;
                }
            }
        }
    }
    grid
}

fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::cell::RawCell;
use super::workbook::{Grid, Workbook, WorkbookError};

/// Открывает xlsx/xlsm/xlsb/xls/ods и переводит каждый лист в `Grid`.
///
/// calamine отдаёт закэшированные значения формул и уже склеенный rich text,
/// поэтому здесь появляются только простые варианты `RawCell`.
pub fn load(path: &Path) -> Result<Workbook, WorkbookError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| WorkbookError::Open(e.to_string()))?;

    let sheets = workbook
        .sheet_names()
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).map_err(|e| e.to_string());
            (name, range)
        })
        .collect::<Vec<_>>();

    let loaded = collect_sheets(sheets)?;
    tracing::debug!(
        "Loaded {} sheet(s) from {}",
        loaded.sheets.len(),
        path.display()
    );
    Ok(loaded)
}

/// Нечитаемый лист пропускается и попадает в `load_errors`. Книга без
/// единого прочитанного листа отклоняется с первой ошибкой.
fn collect_sheets<I>(sheets: I) -> Result<Workbook, WorkbookError>
where
    I: IntoIterator<Item = (String, Result<Range<Data>, String>)>,
{
    let mut grids = Vec::new();
    let mut failures = Vec::new();
    for (name, range) in sheets {
        match range {
            Ok(range) => grids.push(range_to_grid(&name, &range)),
            Err(message) => {
                tracing::warn!("Sheet '{}' skipped: {}", name, message);
                failures.push(WorkbookError::Sheet {
                    sheet: name,
                    message,
                });
            }
        }
    }

    if grids.is_empty() && !failures.is_empty() {
        return Err(failures.remove(0));
    }
    let errors = failures.iter().map(|e| e.to_string()).collect();
    Ok(Workbook::from_grids(grids).with_load_errors(errors))
}

/// Range может начинаться не с A1: сохраняем абсолютные номера строк и колонок
fn range_to_grid(name: &str, range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<RawCell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![RawCell::Empty; col_offset];
        cells.extend(row.iter().map(convert));
        rows.push(cells);
    }
    Grid::new(name, rows)
}

fn convert(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => RawCell::Date(ndt),
            None => RawCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

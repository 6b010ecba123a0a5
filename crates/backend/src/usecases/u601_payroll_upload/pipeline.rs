//! Проход по всем листам книги: заголовок, сопоставление колонок, разбор строк.

use crate::shared::excel::{Workbook, Worksheet};

use super::column_classifier::{classify_columns, ColumnMapping};
use super::errors::{IngestError, RowParseError};
use super::header_locator::locate_header;
use super::row_parser::{ParsedRow, RowOutcome, RowParser};
use super::settings::IngestSettings;

/// Результат разбора одного файла, до записи в хранилище
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Строки в порядке листов и строк файла
    pub rows: Vec<ParsedRow>,
    /// Строки данных, отброшенные проверкой или упавшие при чтении
    pub skipped: usize,
    pub errors: Vec<String>,
}

pub fn parse_workbook(
    workbook: &Workbook,
    settings: &IngestSettings,
    effective_date: &str,
) -> Result<ParsedBatch, IngestError> {
    if workbook.sheets.is_empty() {
        return Err(IngestError::NoWorksheets);
    }
    if workbook.total_rows() == 0 {
        return Err(IngestError::EmptyWorkbook);
    }

    let mut batch = ParsedBatch::default();
    batch.errors.extend(workbook.load_errors.iter().cloned());
    for sheet in &workbook.sheets {
        parse_sheet(sheet.as_ref(), settings, effective_date, &mut batch);
    }
    Ok(batch)
}

pub fn mapping_for(sheet: &dyn Worksheet, settings: &IngestSettings) -> ColumnMapping {
    match locate_header(sheet, settings.header_scan_rows) {
        Some(header) => {
            let mapping = classify_columns(header.row, &header.headers);
            if mapping.is_valid() {
                mapping
            } else {
                ColumnMapping::fallback()
            }
        }
        None => ColumnMapping::fallback(),
    }
}

fn parse_sheet(
    sheet: &dyn Worksheet,
    settings: &IngestSettings,
    effective_date: &str,
    batch: &mut ParsedBatch,
) {
    let mapping = mapping_for(sheet, settings);
    if mapping.is_fallback() {
        tracing::info!("Sheet '{}': no header found, scanning cells", sheet.name());
    } else {
        tracing::info!(
            "Sheet '{}': header at row {} ({:?})",
            sheet.name(),
            mapping.header_row,
            mapping
        );
    }

    let parser = RowParser::new(&mapping, settings, effective_date);
    for row in (mapping.header_row + 1)..=sheet.row_count() {
        let cells = match sheet.row(row) {
            Ok(cells) => cells,
            Err(source) => {
                let err = RowParseError {
                    sheet: sheet.name().to_string(),
                    row,
                    source,
                };
                tracing::warn!("{}", err);
                batch.skipped += 1;
                batch.errors.push(err.to_string());
                continue;
            }
        };
        match parser.parse(&cells) {
            RowOutcome::Parsed(parsed) => batch.rows.push(*parsed),
            RowOutcome::Discarded(reason) => {
                tracing::debug!("Sheet '{}' row {} discarded: {:?}", sheet.name(), row, reason);
                batch.skipped += 1;
            }
            RowOutcome::Blank | RowOutcome::Stray => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::excel::{Grid, RawCell};

    fn payroll_grid() -> Grid {
        Grid::from_text_rows(
            "Sheet1",
            vec![
                vec!["कार्यालय", "", "", ""],
                vec!["", "", "", ""],
                vec!["पान नं.", "नाम", "दर", "पाउने रकम"],
                vec!["12345", "/fd axfb'/", "1200", "35,000"],
                vec!["जम्मा", "", "", ""],
            ],
        )
    }

    #[test]
    fn test_end_to_end_sheet() {
        let workbook = Workbook::from_grids(vec![payroll_grid()]);
        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.skipped, 0);
        assert!(batch.errors.is_empty());
        assert_eq!(batch.rows[0].identifier.value, "000012345");
        assert_eq!(batch.rows[0].net_amount, 35000.0);
    }

    #[test]
    fn test_title_row_above_header_keeps_mapping() {
        let grid = Grid::from_text_rows(
            "Sheet1",
            vec![
                vec!["तलब भुक्तानी खाता विवरण", "", "", ""],
                vec!["पान नं.", "नाम", "दर", "पाउने रकम"],
                vec!["123456789", "Ram", "1200", "35,000"],
            ],
        );
        let sheet: &dyn Worksheet = &grid;
        assert_eq!(mapping_for(sheet, &IngestSettings::default()).header_row, 2);

        let workbook = Workbook::from_grids(vec![grid]);
        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        assert_eq!(batch.rows.len(), 1);
        let row = &batch.rows[0];
        assert_eq!(row.identifier.value, "123456789");
        assert_eq!(row.name.as_ref().unwrap().converted, "Ram");
        assert_eq!(row.rate, Some(1200.0));
        assert_eq!(row.account_number, None);
        assert_eq!(row.net_amount, 35000.0);
    }

    #[test]
    fn test_fallback_without_header() {
        let grid = Grid::from_text_rows(
            "Sheet1",
            vec![
                vec!["1", "Ram Thapa", "123456789", "25,000", "500"],
                vec!["2", "Sita Rai", "987654321", "31,000.50", "750"],
            ],
        );
        let workbook = Workbook::from_grids(vec![grid]);
        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].identifier.value, "123456789");
        assert_eq!(batch.rows[0].net_amount, 25000.0);
        assert_eq!(batch.rows[1].identifier.value, "987654321");
        assert_eq!(batch.rows[1].net_amount, 31000.5);
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let grid = Grid::from_text_rows(
            "Sheet1",
            vec![
                vec!["PAN", "Name", "Net"],
                vec!["123456789", "Ram", "30000"],
                vec!["", "Nobody", "30000"],
                vec!["987654321", "Hari", "n/a"],
            ],
        );
        let workbook = Workbook::from_grids(vec![grid]);
        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.skipped, 2);
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn test_row_error_does_not_stop_sheet() {
        let mut grid = Grid::from_text_rows(
            "Broken",
            vec![vec!["PAN", "Net"], vec!["111111111", "20000"]],
        );
        grid.push_broken_row("CSV error: found record with 3 fields");
        grid.push_row(vec![RawCell::text("333333333"), RawCell::Number(22000.0)]);

        let workbook = Workbook::from_grids(vec![grid]);
        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.errors.len(), 1);
        assert!(batch.errors[0].contains("row 3"));
        assert_eq!(batch.rows[1].identifier.value, "333333333");
    }

    #[test]
    fn test_skipped_sheet_is_reported() {
        let workbook = Workbook::from_grids(vec![Grid::from_text_rows(
            "Shrawan",
            vec![vec!["PAN", "Net"], vec!["111111111", "20000"]],
        )])
        .with_load_errors(vec!["failed to read sheet 'Chart1': bad xml".to_string()]);

        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.errors, vec!["failed to read sheet 'Chart1': bad xml".to_string()]);
    }

    #[test]
    fn test_sheets_are_processed_in_order() {
        let first = Grid::from_text_rows("A", vec![vec!["PAN", "Net"], vec!["111111111", "20000"]]);
        let second = Grid::from_text_rows("B", vec![vec!["PAN", "Net"], vec!["111111111", "25000"]]);
        let workbook = Workbook::from_grids(vec![first, second]);
        let batch = parse_workbook(&workbook, &IngestSettings::default(), "").unwrap();
        let amounts: Vec<f64> = batch.rows.iter().map(|r| r.net_amount).collect();
        assert_eq!(amounts, vec![20000.0, 25000.0]);
    }

    #[test]
    fn test_structural_errors() {
        let empty = Workbook::new(Vec::new());
        assert!(matches!(
            parse_workbook(&empty, &IngestSettings::default(), ""),
            Err(IngestError::NoWorksheets)
        ));

        let no_rows = Workbook::from_grids(vec![Grid::new("Empty", Vec::new())]);
        assert!(matches!(
            parse_workbook(&no_rows, &IngestSettings::default(), ""),
            Err(IngestError::EmptyWorkbook)
        ));
    }
}

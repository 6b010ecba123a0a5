use crate::shared::excel::Worksheet;

use super::column_classifier::classify_columns;

/// Найденная строка заголовка: номер и тексты непустых ячеек
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    pub row: usize,
    pub headers: Vec<(usize, String)>,
}

/// Ищет заголовок в строках 1..=min(scan_rows, row_count).
///
/// Строка подходит, если в ней есть колонка идентификатора (или счёта) и
/// отдельная колонка суммы (net или gross). Побеждает первая подходящая строка.
/// Нечитаемые строки пропускаются: поиск заголовка никогда не падает.
pub fn locate_header(sheet: &dyn Worksheet, scan_rows: usize) -> Option<HeaderRow> {
    let last = scan_rows.min(sheet.row_count());
    for row in 1..=last {
        let headers = match sheet.row_texts(row) {
            Ok(texts) => texts,
            Err(e) => {
                tracing::debug!("Header scan: skipping row {} of '{}': {}", row, sheet.name(), e);
                continue;
            }
        };
        if is_header_row(&headers) {
            return Some(HeaderRow { row, headers });
        }
    }
    None
}

/// Одна ячейка не может быть одновременно идентификатором и суммой: строка
/// проверяется тем же сопоставлением колонок, что и найденный заголовок
pub fn is_header_row(headers: &[(usize, String)]) -> bool {
    let mapping = classify_columns(0, headers);
    mapping.has_identifier_column() && mapping.has_amount_column()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::excel::Grid;

    #[test]
    fn test_first_qualifying_row_wins() {
        let grid = Grid::from_text_rows(
            "Sheet1",
            [
                vec!["Payroll for Shrawan", "", ""],
                vec!["PAN", "Name", ""],
                vec!["PAN", "Name", "Net"],
                vec!["PAN", "Name", "Gross"],
            ],
        );
        let header = locate_header(&grid, 20).unwrap();
        assert_eq!(header.row, 3);
        assert_eq!(header.headers.len(), 3);
    }

    #[test]
    fn test_scan_window_is_bounded() {
        let mut rows: Vec<Vec<&str>> = vec![vec!["x", "1"]; 20];
        rows.push(vec!["PAN", "Net"]);
        let grid = Grid::from_text_rows("Sheet1", rows);
        assert!(locate_header(&grid, 20).is_none());
        assert_eq!(locate_header(&grid, 21).unwrap().row, 21);
    }

    #[test]
    fn test_no_header_in_short_sheet() {
        let grid = Grid::from_text_rows("Sheet1", [vec!["123456789", "Ram", "35000"]]);
        assert!(locate_header(&grid, 20).is_none());
    }

    #[test]
    fn test_account_and_gross_qualify() {
        assert!(is_header_row(&[
            (1, "Bank A/C".to_string()),
            (2, "Gross".to_string())
        ]));
        assert!(!is_header_row(&[(1, "नाम".to_string()), (2, "पाउने रकम".to_string())]));
    }

    #[test]
    fn test_title_cell_matching_both_families_is_not_a_header() {
        // "खाता" (account) and "तलब" (gross) in one title cell
        assert!(!is_header_row(&[(1, "तलब भुक्तानी खाता विवरण".to_string())]));

        let grid = Grid::from_text_rows(
            "Sheet1",
            [
                vec!["तलब भुक्तानी खाता विवरण", "", "", ""],
                vec!["पान नं.", "नाम", "दर", "पाउने रकम"],
                vec!["123456789", "Ram", "1200", "35,000"],
            ],
        );
        let header = locate_header(&grid, 20).unwrap();
        assert_eq!(header.row, 2);
    }
}

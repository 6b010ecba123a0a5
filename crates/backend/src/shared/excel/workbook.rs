use std::collections::BTreeMap;

use thiserror::Error;

use super::cell::{extract_text, RawCell};

/// Ошибки загрузчика книги и доступа к ячейкам
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to open workbook: {0}")]
    Open(String),

    #[error("failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("row {row} is not readable: {message}")]
    Row { row: usize, message: String },
}

/// Лист книги. Строки и колонки нумеруются с 1, как в Excel.
pub trait Worksheet {
    fn name(&self) -> &str;

    fn row_count(&self) -> usize;

    /// Все ячейки строки, начиная с колонки 1
    fn row(&self, row: usize) -> Result<Vec<RawCell>, WorkbookError>;

    /// Непустые ячейки строки вместе с номером колонки
    fn non_empty_cells(&self, row: usize) -> Result<Vec<(usize, RawCell)>, WorkbookError> {
        Ok(self
            .row(row)?
            .into_iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(idx, cell)| (idx + 1, cell))
            .collect())
    }

    /// Text of the non-empty cells keyed by column
    fn row_texts(&self, row: usize) -> Result<Vec<(usize, String)>, WorkbookError> {
        Ok(self
            .non_empty_cells(row)?
            .iter()
            .map(|(col, cell)| (*col, extract_text(cell)))
            .collect())
    }
}

/// Лист в памяти: прямоугольник (возможно рваный) из ячеек
#[derive(Debug, Clone, Default)]
pub struct Grid {
    name: String,
    rows: Vec<Vec<RawCell>>,
    /// Строки, которые загрузчик не смог прочитать: номер -> причина
    broken: BTreeMap<usize, String>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            rows,
            broken: BTreeMap::new(),
        }
    }

    /// Добавляет нечитаемую строку: она занимает место в нумерации, а `row`
    /// возвращает для неё ошибку
    pub fn push_broken_row(&mut self, message: impl Into<String>) {
        self.rows.push(Vec::new());
        self.broken.insert(self.rows.len(), message.into());
    }

    pub fn push_row(&mut self, cells: Vec<RawCell>) {
        self.rows.push(cells);
    }

    /// Удобный конструктор для текстовых таблиц (CSV, тесты)
    pub fn from_text_rows<R, S>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|s| RawCell::from(s.as_ref())).collect())
            .collect();
        Self::new(name, rows)
    }
}

impl Worksheet for Grid {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, row: usize) -> Result<Vec<RawCell>, WorkbookError> {
        if let Some(message) = self.broken.get(&row) {
            return Err(WorkbookError::Row {
                row,
                message: message.clone(),
            });
        }
        row.checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .cloned()
            .ok_or_else(|| WorkbookError::Row {
                row,
                message: format!("sheet '{}' has {} rows", self.name, self.rows.len()),
            })
    }
}

/// Упорядоченный набор листов
pub struct Workbook {
    pub sheets: Vec<Box<dyn Worksheet + Send + Sync>>,
    /// Листы, пропущенные при загрузке
    pub load_errors: Vec<String>,
}

impl Workbook {
    pub fn new(sheets: Vec<Box<dyn Worksheet + Send + Sync>>) -> Self {
        Self {
            sheets,
            load_errors: Vec::new(),
        }
    }

    pub fn with_load_errors(mut self, errors: Vec<String>) -> Self {
        self.load_errors = errors;
        self
    }

    pub fn from_grids(grids: Vec<Grid>) -> Self {
        Self::new(
            grids
                .into_iter()
                .map(|g| Box::new(g) as Box<dyn Worksheet + Send + Sync>)
                .collect(),
        )
    }

    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.row_count()).sum()
    }
}

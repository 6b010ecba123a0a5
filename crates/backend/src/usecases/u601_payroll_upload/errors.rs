use thiserror::Error;

use crate::shared::excel::WorkbookError;

/// Файл целиком не может быть обработан
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("workbook has no worksheets")]
    NoWorksheets,

    #[error("workbook has no rows")]
    EmptyWorkbook,

    #[error(transparent)]
    Load(#[from] WorkbookError),
}

/// Ошибка чтения одной строки; строка пропускается, обработка продолжается
#[derive(Debug, Error)]
#[error("sheet '{sheet}', row {row}: {source}")]
pub struct RowParseError {
    pub sheet: String,
    pub row: usize,
    #[source]
    pub source: WorkbookError,
}

use serde::{Deserialize, Serialize};

use crate::domain::a001_payroll_record::PayrollRecord;

/// Итог загрузки одного файла
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub filename: String,
    pub rows_read: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,

    /// Первые N разобранных строк для предпросмотра
    pub records: Vec<PayrollRecord>,
}

impl UploadOutcome {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Файл отклонён целиком (нет листов, нет строк, не удалось открыть)
    pub fn rejected(filename: impl Into<String>, message: impl Into<String>) -> Self {
        let mut outcome = Self::new(filename);
        outcome.errors.push(message.into());
        outcome
    }
}

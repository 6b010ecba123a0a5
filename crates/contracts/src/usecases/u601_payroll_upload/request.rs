use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Режим записи результатов загрузки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// История: строка вставляется только если её content hash ещё не встречался
    #[default]
    Ledger,
    /// Снимок: одна запись на идентификатор, изменяемые поля перезаписываются
    Snapshot,
}

/// Запрос на загрузку ведомостей
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub mode: StorageMode,

    /// Дата, к которой относится ведомость (входит в content hash)
    pub effective_date: Option<NaiveDate>,
}

impl UploadRequest {
    pub fn new(mode: StorageMode) -> Self {
        Self {
            mode,
            effective_date: None,
        }
    }

    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    /// ISO date or empty string, as used by the content hash
    pub fn effective_date_key(&self) -> String {
        self.effective_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

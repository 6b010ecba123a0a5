use chrono::{DateTime, Utc};
use contracts::domain::a001_payroll_record::{DutyDays, TransliteratedText};

/// Поля, которые задаются при первой записи и больше не перезаписываются
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityFields {
    pub name: Option<TransliteratedText>,
    pub position: Option<TransliteratedText>,
    pub department: Option<TransliteratedText>,
    pub account_number: Option<String>,
}

impl IdentityFields {
    /// Заполняет пустые поля из `other` (первое непустое значение побеждает)
    pub fn fill_missing_from(&mut self, other: &IdentityFields) {
        if self.name.is_none() {
            self.name = other.name.clone();
        }
        if self.position.is_none() {
            self.position = other.position.clone();
        }
        if self.department.is_none() {
            self.department = other.department.clone();
        }
        if self.account_number.is_none() {
            self.account_number = other.account_number.clone();
        }
    }
}

/// Поля, которые перезаписываются при каждой загрузке
#[derive(Debug, Clone, PartialEq)]
pub struct MutableFields {
    pub rate: Option<f64>,
    pub gross_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub net_amount: f64,
    pub duty_days: Option<DutyDays>,
    pub content_hash: String,
    pub source: String,
    pub effective_date: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Результат upsert по идентификатору
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertResult {
    pub inserted: bool,
    pub modified: bool,
}

/// Строка истории (append-only), уникальна по content hash
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub identifier: String,
    pub identity: IdentityFields,
    pub values: MutableFields,
}

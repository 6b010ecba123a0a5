use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Вид числового идентификатора сотрудника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// 9-значный налоговый номер (PAN)
    TaxId,
    /// Номер банковского счёта, 13–17 цифр
    AccountNumber,
    Unknown,
}

/// Text field as it was in the sheet plus its standard-script form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransliteratedText {
    pub original: String,
    pub converted: String,
}

impl TransliteratedText {
    /// Текст, который не требовал конвертации
    pub fn unchanged(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            converted: text.clone(),
            original: text,
        }
    }

    pub fn was_converted(&self) -> bool {
        self.original != self.converted
    }
}

/// Отработанные дни по трём периодам и итог
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DutyDays {
    pub periods: [Option<f64>; 3],
    pub total: Option<f64>,
}

// ============================================================================
// Record
// ============================================================================

/// Нормализованная строка ведомости, ключ: идентификатор сотрудника
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub identifier: String,
    pub identifier_kind: IdentifierKind,
    pub name: Option<TransliteratedText>,
    pub position: Option<TransliteratedText>,
    pub department: Option<TransliteratedText>,
    pub account_number: Option<String>,
    pub duty_days: Option<DutyDays>,
    pub rate: Option<f64>,
    pub gross_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub net_amount: f64,
    pub content_hash: String,
}

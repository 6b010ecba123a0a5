//! Разбор одной строки данных: по колонкам заголовка, а без них
//! сканированием всех ячеек.

use std::collections::HashSet;

use contracts::domain::a001_payroll_record::{DutyDays, PayrollRecord, TransliteratedText};

use crate::domain::a001_payroll_record::identifier::{
    self, clean, disambiguate, validate_flexible, NormalizedIdentifier, FLEXIBLE_MAX_LEN,
    TAX_ID_LEN,
};
use crate::domain::a001_payroll_record::IdentityFields;
use crate::shared::excel::{extract_text, RawCell};
use crate::shared::legacy_font;

use super::column_classifier::{ColumnMapping, Field};
use super::planner::content_hash;
use super::settings::IngestSettings;

/// Слова заголовка, по которым распознаются повторённые шапки внутри данных
const HEADER_KEYWORDS: &[&str] = &[
    "पान", "नं", "नाम", "पद", "दर", "रकम", "तलब", "खाता", "जम्मा", "कुल", "विभाग", "शाखा",
    "आयकर", "पाउने", "खुद", "दिन", "क्र.सं", "सि.नं", "pan", "name", "designation", "position",
    "rate", "amount", "salary", "net", "gross", "tax", "tds", "account", "total", "days", "s.n",
    "gfd", "kfg", "tna", "/sd", "vftf", "hddf", "kfpg]",
];

/// Строка итогов: ячейка целиком состоит из такого слова
const TOTAL_MARKERS: &[&str] = &[
    "जम्मा", "कुल जम्मा", "कुल", "total", "grand total", "sub total", "subtotal", "hddf",
    "s'n hddf",
];

/// Нормализованная строка ведомости. После создания не меняется.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub identifier: NormalizedIdentifier,
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

impl ParsedRow {
    pub fn identity(&self) -> IdentityFields {
        IdentityFields {
            name: self.name.clone(),
            position: self.position.clone(),
            department: self.department.clone(),
            account_number: self.account_number.clone(),
        }
    }

    pub fn to_record(&self) -> PayrollRecord {
        PayrollRecord {
            identifier: self.identifier.value.clone(),
            identifier_kind: self.identifier.kind,
            name: self.name.clone(),
            position: self.position.clone(),
            department: self.department.clone(),
            account_number: self.account_number.clone(),
            duty_days: self.duty_days.clone(),
            rate: self.rate,
            gross_amount: self.gross_amount,
            tax_amount: self.tax_amount,
            net_amount: self.net_amount,
            content_hash: self.content_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    NoIdentifier,
    NoAmount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Parsed(Box<ParsedRow>),
    /// Пустая строка
    Blank,
    /// Повторённая шапка или строка итогов
    Stray,
    /// Не прошла проверку идентификатора или суммы
    Discarded(DiscardReason),
}

pub struct RowParser<'a> {
    mapping: &'a ColumnMapping,
    settings: &'a IngestSettings,
    effective_date: &'a str,
}

impl<'a> RowParser<'a> {
    pub fn new(mapping: &'a ColumnMapping, settings: &'a IngestSettings, effective_date: &'a str) -> Self {
        Self {
            mapping,
            settings,
            effective_date,
        }
    }

    pub fn parse(&self, cells: &[RawCell]) -> RowOutcome {
        let texts: Vec<String> = cells.iter().map(extract_text).collect();
        if texts.iter().all(|t| t.trim().is_empty()) {
            return RowOutcome::Blank;
        }
        if is_stray_row(&texts, self.settings.stray_keyword_density) {
            return RowOutcome::Stray;
        }

        let Some((id_digits, account)) = self.extract_identifier(&texts) else {
            return RowOutcome::Discarded(DiscardReason::NoIdentifier);
        };
        let Some(identifier) = NormalizedIdentifier::parse(&id_digits) else {
            return RowOutcome::Discarded(DiscardReason::NoIdentifier);
        };

        let Some(net_amount) = self.extract_amount(&texts, &id_digits) else {
            return RowOutcome::Discarded(DiscardReason::NoAmount);
        };

        let name = self
            .mapped_text(&texts, Field::Name)
            .or_else(|| self.scan_name(&texts))
            .map(|t| legacy_font::transliterate(&t).into());
        let position = self
            .mapped_text(&texts, Field::Position)
            .map(|t| legacy_font::transliterate(&t).into());
        let department: Option<TransliteratedText> = self
            .mapped_text(&texts, Field::Department)
            .map(|t| legacy_font::transliterate(&t).into());

        let content_hash = content_hash(
            &identifier.value,
            department.as_ref().map(|d| d.converted.as_str()).unwrap_or(""),
            self.effective_date,
            net_amount,
        );

        RowOutcome::Parsed(Box::new(ParsedRow {
            account_number: (!account.is_empty()).then_some(account),
            duty_days: self.extract_duty_days(&texts),
            rate: self.mapped_number(&texts, Field::Rate),
            gross_amount: self.mapped_number(&texts, Field::Gross),
            tax_amount: self.mapped_number(&texts, Field::Tax),
            identifier,
            name,
            position,
            department,
            net_amount,
            content_hash,
        }))
    }

    fn mapped<'t>(&self, texts: &'t [String], field: Field) -> &'t str {
        self.mapping
            .column(field)
            .and_then(|col| texts.get(col - 1))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn mapped_text(&self, texts: &[String], field: Field) -> Option<String> {
        let value = self.mapped(texts, field);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn mapped_number(&self, texts: &[String], field: Field) -> Option<f64> {
        parse_amount(self.mapped(texts, field))
    }

    /// (цифры идентификатора, цифры счёта); `None`, если идентификатора нет
    fn extract_identifier(&self, texts: &[String]) -> Option<(String, String)> {
        let (mut id, account) = if self.mapping.has_identifier_column() {
            disambiguate(
                self.mapped(texts, Field::Identifier),
                self.mapped(texts, Field::Account),
            )
        } else {
            let skip = self.non_identifier_columns();
            let token = scan_identifier_token(texts, &skip).unwrap_or_default();
            (token, String::new())
        };

        if !validate_flexible(&id) {
            // Файл без колонки идентификатора: номер счёта становится ключом
            id = if self.is_account_like(&account) {
                account.clone()
            } else {
                let skip = self.non_identifier_columns();
                texts
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| !skip.contains(&(idx + 1)))
                    .flat_map(|(_, t)| numeric_tokens(t))
                    .map(|t| t.digits)
                    .find(|d| self.is_account_like(d))?
            };
        }
        Some((id, account))
    }

    fn is_account_like(&self, digits: &str) -> bool {
        (self.settings.account_token_min_len..=FLEXIBLE_MAX_LEN).contains(&digits.len())
    }

    /// Колонки, в которых точно нет идентификатора
    fn non_identifier_columns(&self) -> HashSet<usize> {
        self.mapping.columns_of(&[
            Field::Net,
            Field::Gross,
            Field::Tax,
            Field::Rate,
            Field::DutyPeriod1,
            Field::DutyPeriod2,
            Field::DutyPeriod3,
            Field::DutyTotal,
        ])
    }

    /// net, затем gross; если ни одна колонка не дала положительного числа,
    /// берётся наибольшее правдоподобное число в строке (но не 9-значное и не сам идентификатор)
    fn extract_amount(&self, texts: &[String], id_digits: &str) -> Option<f64> {
        let positive = |v: Option<f64>| v.filter(|n| *n > 0.0);
        positive(self.mapped_number(texts, Field::Net))
            .or_else(|| positive(self.mapped_number(texts, Field::Gross)))
            .or_else(|| self.scan_amount(texts, id_digits))
    }

    fn scan_amount(&self, texts: &[String], id_digits: &str) -> Option<f64> {
        let normalized_id = identifier::normalize(id_digits);
        texts
            .iter()
            .flat_map(|t| numeric_tokens(t))
            .filter(|t| t.digits.len() != TAX_ID_LEN)
            .filter(|t| t.digits != id_digits && t.digits != normalized_id)
            .map(|t| t.value)
            .filter(|v| self.settings.is_plausible_salary(*v))
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
    }

    /// Первая ячейка с буквами (латиница или деванагари), не число, разумной длины
    fn scan_name(&self, texts: &[String]) -> Option<String> {
        let taken = self.mapping.columns_of(&[Field::Position, Field::Department]);
        texts
            .iter()
            .enumerate()
            .filter(|(idx, _)| !taken.contains(&(idx + 1)))
            .map(|(_, t)| t)
            .find(|t| {
                t.chars().any(char::is_alphabetic)
                    && !is_numeric_text(t)
                    && self.settings.is_plausible_name_len(t.chars().count())
            })
            .cloned()
    }

    fn extract_duty_days(&self, texts: &[String]) -> Option<DutyDays> {
        let periods = [
            self.mapped_number(texts, Field::DutyPeriod1),
            self.mapped_number(texts, Field::DutyPeriod2),
            self.mapped_number(texts, Field::DutyPeriod3),
        ];
        let total = self.mapped_number(texts, Field::DutyTotal).or_else(|| {
            periods
                .iter()
                .any(Option::is_some)
                .then(|| periods.iter().flatten().sum())
        });
        if periods.iter().all(Option::is_none) && total.is_none() {
            return None;
        }
        Some(DutyDays { periods, total })
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Число из ячейки в строке данных
#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken {
    /// Целая часть без разделителей тысяч
    pub digits: String,
    pub value: f64,
}

/// Числа в тексте: цифры с разделителями тысяч и необязательной дробной частью
pub fn numeric_tokens(text: &str) -> Vec<NumericToken> {
    let chars: Vec<char> = fold_digits(text).chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut digits = String::new();
        while i < chars.len() {
            let c = chars[i];
            let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_digit() {
                digits.push(c);
            } else if c == ',' && next_is_digit {
                // thousands separator
            } else {
                break;
            }
            i += 1;
        }
        let mut fraction = String::new();
        if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                fraction.push(chars[i]);
                i += 1;
            }
        }
        let literal = if fraction.is_empty() {
            digits.clone()
        } else {
            format!("{}.{}", digits, fraction)
        };
        if let Ok(value) = literal.parse::<f64>() {
            tokens.push(NumericToken { digits, value });
        }
    }
    tokens
}

/// Предпочитает 9-значный токен, иначе первый токен длиной 1–17
pub fn scan_identifier_token(texts: &[String], skip_columns: &HashSet<usize>) -> Option<String> {
    let candidates: Vec<String> = texts
        .iter()
        .enumerate()
        .filter(|(idx, t)| !t.is_empty() && !skip_columns.contains(&(idx + 1)))
        .flat_map(|(_, t)| numeric_tokens(t))
        .filter(|t| t.value.fract() == 0.0)
        .map(|t| t.digits)
        .collect();
    candidates
        .iter()
        .find(|d| d.len() == TAX_ID_LEN)
        .or_else(|| candidates.iter().find(|d| validate_flexible(d)))
        .cloned()
}

/// "35,000", "Rs. 35,000/-", "३५०००" -> 35000
pub fn parse_amount(text: &str) -> Option<f64> {
    let folded = fold_digits(text.trim());
    let negative = folded.starts_with('-');
    let literal: String = folded
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let literal = literal.trim_start_matches('.').trim_end_matches('.');
    if literal.is_empty() {
        return None;
    }
    let value: f64 = literal.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '०'..='९' => char::from_digit(c as u32 - '०' as u32, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn is_numeric_text(text: &str) -> bool {
    !clean(text).is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || ('०'..='९').contains(&c) || ",.-/ ".contains(c))
}

/// Повторённая шапка (много слов заголовка) или строка итогов
pub fn is_stray_row(texts: &[String], density: usize) -> bool {
    let mut hits: HashSet<&str> = HashSet::new();
    for text in texts.iter().filter(|t| !t.is_empty()) {
        let lower = text.to_lowercase();
        let marker = lower.trim().trim_end_matches([':', '.']);
        if TOTAL_MARKERS.contains(&marker) {
            return true;
        }
        for word in lower.split_whitespace() {
            let word = word.trim_matches(|c: char| matches!(c, '.' | ',' | ':' | '(' | ')'));
            if let Some(kw) = HEADER_KEYWORDS.iter().find(|kw| **kw == word) {
                hits.insert(*kw);
            }
        }
    }
    hits.len() >= density
}

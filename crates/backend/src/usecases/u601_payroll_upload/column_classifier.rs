//! Сопоставление текста заголовков с полями ведомости.
//!
//! Таблица синонимов декларативна и не зависит от раскладки листа. Для каждого
//! поля хранятся три вида написания: деванагари, английский и те же слова,
//! набранные шрифтом Preeti (заголовки тоже бывают в legacy-кодировке).

use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Identifier,
    Account,
    DutyPeriod1,
    DutyPeriod2,
    DutyPeriod3,
    DutyTotal,
    Net,
    Rate,
    Gross,
    Tax,
    Name,
    Position,
    Department,
}

/// Порядок строк задаёт приоритет захвата колонок: колонку получает первое
/// поле, которое её совпало, остальные поля её уже не видят.
pub const SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Identifier, &["पान", "स्थायी लेखा", "pan", "tax id", "kfg"]),
    (Field::Account, &["खाता", "account", "a/c", "acc no", "bank ac", "vftf"]),
    (Field::DutyPeriod1, &["पहिलो", "period 1", "duty 1", "days 1", "klxnf]"]),
    (Field::DutyPeriod2, &["दोस्रो", "period 2", "duty 2", "days 2", "bf]:|f]"]),
    (Field::DutyPeriod3, &["तेस्रो", "period 3", "duty 3", "days 3", "t]:|f]"]),
    (
        Field::DutyTotal,
        &["जम्मा दिन", "कुल दिन", "जम्मा हाजिर", "total days", "total duty", "duty total", "hddf lbg", "s'n lbg"],
    ),
    (Field::Net, &["पाउने", "खुद", "भुक्तानी", "net", "kfpg]", "v'b"]),
    (Field::Rate, &["दर", "rate", "per day", "b/"]),
    (
        Field::Gross,
        &["कुल तलब", "जम्मा तलब", "कुल रकम", "तलब", "gross", "total salary", "total amount", "salary", "tna"],
    ),
    (Field::Tax, &["आयकर", "कर कट्टी", "पारिश्रमिक कर", "tax", "tds", "cfos/"]),
    (Field::Name, &["नाम", "name", "gfd"]),
    (Field::Position, &["पद", "designation", "position", "post", "kb"]),
    (
        Field::Department,
        &["विभाग", "शाखा", "कार्यालय", "department", "dept", "section", "office", "ljefu", "zfvf"],
    ),
];

/// Регистронезависимое вхождение любого синонима в текст заголовка
pub fn header_matches(header: &str, synonyms: &[&str]) -> bool {
    let header = header.to_lowercase();
    synonyms
        .iter()
        .any(|s| header.contains(s.to_lowercase().as_str()))
}

/// Номер строки заголовка и колонки (с 1) для найденных полей
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    /// 0, если заголовок не найден: все строки считаются данными
    pub header_row: usize,
    columns: BTreeMap<Field, usize>,
}

impl ColumnMapping {
    /// Режим без заголовка
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn has_identifier_column(&self) -> bool {
        self.has(Field::Identifier) || self.has(Field::Account)
    }

    pub fn has_amount_column(&self) -> bool {
        self.has(Field::Net) || self.has(Field::Gross)
    }

    /// Без колонок идентификатора и суммы сопоставление бесполезно
    pub fn is_valid(&self) -> bool {
        self.has_identifier_column() || self.has_amount_column()
    }

    pub fn is_fallback(&self) -> bool {
        self.header_row == 0
    }

    /// Columns claimed by any of `fields`
    pub fn columns_of(&self, fields: &[Field]) -> HashSet<usize> {
        fields.iter().filter_map(|f| self.column(*f)).collect()
    }
}

/// Классифицирует колонки строки заголовка. `headers`: (колонка, текст)
/// в порядке возрастания колонки; пустые ячейки уже отброшены.
pub fn classify_columns(header_row: usize, headers: &[(usize, String)]) -> ColumnMapping {
    let mut columns = BTreeMap::new();
    let mut claimed: HashSet<usize> = HashSet::new();

    for (field, synonyms) in SYNONYMS {
        let found = headers
            .iter()
            .find(|(col, text)| !claimed.contains(col) && header_matches(text, synonyms));
        if let Some((col, _)) = found {
            claimed.insert(*col);
            columns.insert(*field, *col);
        }
    }

    ColumnMapping {
        header_row,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(texts: &[&str]) -> Vec<(usize, String)> {
        texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .map(|(i, t)| (i + 1, t.to_string()))
            .collect()
    }

    #[test]
    fn test_header_matches_is_case_insensitive_substring() {
        assert!(header_matches("Employee NAME", &["name"]));
        assert!(header_matches("पाउने रकम", &["पाउने"]));
        assert!(!header_matches("Designation", &["name"]));
        assert!(!header_matches("anything", &[]));
    }

    #[test]
    fn test_classify_devanagari_headers() {
        let mapping = classify_columns(3, &headers(&["पान नं.", "नाम", "दर", "पाउने रकम"]));
        assert_eq!(mapping.header_row, 3);
        assert_eq!(mapping.column(Field::Identifier), Some(1));
        assert_eq!(mapping.column(Field::Name), Some(2));
        assert_eq!(mapping.column(Field::Rate), Some(3));
        assert_eq!(mapping.column(Field::Net), Some(4));
        assert_eq!(mapping.column(Field::Gross), None);
        assert!(mapping.is_valid());
    }

    #[test]
    fn test_classify_english_headers() {
        let mapping = classify_columns(
            1,
            &headers(&["S.N.", "PAN No", "Employee Name", "Designation", "Department", "Gross Salary", "TDS", "Net Salary", "Bank A/C"]),
        );
        assert_eq!(mapping.column(Field::Identifier), Some(2));
        assert_eq!(mapping.column(Field::Name), Some(3));
        assert_eq!(mapping.column(Field::Position), Some(4));
        assert_eq!(mapping.column(Field::Department), Some(5));
        assert_eq!(mapping.column(Field::Gross), Some(6));
        assert_eq!(mapping.column(Field::Tax), Some(7));
        assert_eq!(mapping.column(Field::Net), Some(8));
        assert_eq!(mapping.column(Field::Account), Some(9));
    }

    #[test]
    fn test_classify_legacy_font_headers() {
        // नाम, पान, पाउने
        let mapping = classify_columns(2, &headers(&["gfd", "kfg g+=", "kfpg] /sd"]));
        assert_eq!(mapping.column(Field::Name), Some(1));
        assert_eq!(mapping.column(Field::Identifier), Some(2));
        assert_eq!(mapping.column(Field::Net), Some(3));
    }

    #[test]
    fn test_column_is_claimed_once() {
        // "Net Salary" matches both net and gross synonyms; net claims it first
        let mapping = classify_columns(1, &headers(&["PAN", "Net Salary"]));
        assert_eq!(mapping.column(Field::Net), Some(2));
        assert_eq!(mapping.column(Field::Gross), None);
    }

    #[test]
    fn test_duty_columns() {
        let mapping = classify_columns(
            1,
            &headers(&["PAN", "Days 1", "Days 2", "Days 3", "Total Days", "Net"]),
        );
        assert_eq!(mapping.column(Field::DutyPeriod1), Some(2));
        assert_eq!(mapping.column(Field::DutyPeriod2), Some(3));
        assert_eq!(mapping.column(Field::DutyPeriod3), Some(4));
        assert_eq!(mapping.column(Field::DutyTotal), Some(5));
        assert_eq!(mapping.column(Field::Net), Some(6));
    }

    #[test]
    fn test_fallback_mapping_is_invalid() {
        let mapping = ColumnMapping::fallback();
        assert!(mapping.is_fallback());
        assert!(!mapping.is_valid());
    }

    #[test]
    fn test_title_cell_is_claimed_by_one_field() {
        let mapping = classify_columns(1, &headers(&["तलब भुक्तानी खाता विवरण"]));
        assert_eq!(mapping.column(Field::Account), Some(1));
        assert!(!mapping.has_amount_column());
    }
}

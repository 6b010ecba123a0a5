//! Нормализация числовых идентификаторов: налоговый номер (PAN) и номер счёта.

use contracts::domain::a001_payroll_record::IdentifierKind;

/// Длина налогового номера после дополнения нулями
pub const TAX_ID_LEN: usize = 9;
pub const ACCOUNT_MIN_LEN: usize = 13;
pub const ACCOUNT_MAX_LEN: usize = 17;
/// Верхняя граница для мягкой проверки при загрузке
pub const FLEXIBLE_MAX_LEN: usize = 17;

/// Идентификатор после очистки и классификации
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIdentifier {
    /// Только цифры, без дополнения
    pub raw: String,
    /// Дополнен нулями до 9 цифр, если был короче
    pub value: String,
    pub kind: IdentifierKind,
}

impl NormalizedIdentifier {
    /// `None`, если после очистки не осталось ни одной цифры
    pub fn parse(input: &str) -> Option<Self> {
        let raw = clean(input);
        if raw.is_empty() {
            return None;
        }
        let value = normalize(&raw);
        let kind = classify(&value);
        Some(Self { raw, value, kind })
    }
}

/// Оставляет только цифры (деванагари-цифры приводятся к ASCII)
pub fn clean(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '०'..='९' => char::from_digit(c as u32 - '०' as u32, 10),
            _ => None,
        })
        .collect()
}

/// Очистка + дополнение нулями слева до 9 цифр для значений длиной 1–8.
/// Идемпотентна: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(input: &str) -> String {
    let digits = clean(input);
    if (1..TAX_ID_LEN).contains(&digits.len()) {
        format!("{:0>width$}", digits, width = TAX_ID_LEN)
    } else {
        digits
    }
}

pub fn classify(value: &str) -> IdentifierKind {
    match value.len() {
        TAX_ID_LEN => IdentifierKind::TaxId,
        ACCOUNT_MIN_LEN..=ACCOUNT_MAX_LEN => IdentifierKind::AccountNumber,
        _ => IdentifierKind::Unknown,
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Строгая проверка для внешних вызовов: ровно 9 цифр или 13–17 цифр
pub fn validate_strict(value: &str) -> bool {
    let value = value.trim();
    all_digits(value)
        && (value.len() == TAX_ID_LEN
            || (ACCOUNT_MIN_LEN..=ACCOUNT_MAX_LEN).contains(&value.len()))
}

/// Мягкая проверка при загрузке: 1–17 цифр (до дополнения нулями)
pub fn validate_flexible(value: &str) -> bool {
    let value = value.trim();
    all_digits(value) && value.len() <= FLEXIBLE_MAX_LEN
}

/// Разводит значения из колонки идентификатора и колонки счёта.
///
/// Если в колонке идентификатора стоит значение длины счёта, а в колонке
/// счёта короткое, они перепутаны местами. Пустой идентификатор берётся
/// из колонки счёта. Возвращает очищенные (id, account).
pub fn disambiguate(identifier_value: &str, account_value: &str) -> (String, String) {
    let id = clean(identifier_value);
    let account = clean(account_value);

    if id.len() >= ACCOUNT_MIN_LEN && !account.is_empty() && account.len() <= ACCOUNT_MIN_LEN {
        return (account, id);
    }
    if id.is_empty() && !account.is_empty() {
        return (account.clone(), account);
    }
    (id, account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_short_values() {
        assert_eq!(normalize("123"), "000000123");
        assert_eq!(normalize("5"), "000000005");
        assert_eq!(normalize("123456789"), "123456789");
        assert_eq!(normalize("1234567890123"), "1234567890123");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["1", "12345", "123-456-789", "00012", "1234567890", "12345678901234567", "abc"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input}");
        }
    }

    #[test]
    fn test_clean_strips_and_folds_digits() {
        assert_eq!(clean(" 123-456 789 "), "123456789");
        assert_eq!(clean("१२३४५"), "12345");
        assert_eq!(clean("PAN: ६0१"), "601");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("123456789"), IdentifierKind::TaxId);
        assert_eq!(classify("1234567890123"), IdentifierKind::AccountNumber);
        assert_eq!(classify("12345678901234567"), IdentifierKind::AccountNumber);
        assert_eq!(classify("1234567890"), IdentifierKind::Unknown);
    }

    #[test]
    fn test_validation_tiers() {
        assert!(validate_flexible("5"));
        assert!(!validate_strict("5"));
        assert!(validate_strict("123456789"));
        assert!(validate_strict("1234567890123"));
        assert!(!validate_strict("1234567890"));
        assert!(!validate_flexible("123456789012345678"));
        assert!(!validate_flexible(""));
        assert!(!validate_flexible("12a"));
    }

    #[test]
    fn test_disambiguate_swaps_account_into_identifier_column() {
        let (id, account) = disambiguate("1234567890123", "123456789");
        assert_eq!(id, "123456789");
        assert_eq!(account, "1234567890123");
    }

    #[test]
    fn test_disambiguate_takes_account_when_identifier_missing() {
        let (id, account) = disambiguate("", "01-2345-67890123");
        assert_eq!(id, "01234567890123");
        assert_eq!(account, "01234567890123");
    }

    #[test]
    fn test_disambiguate_keeps_consistent_pair() {
        let (id, account) = disambiguate("123456789", "1234567890123");
        assert_eq!(id, "123456789");
        assert_eq!(account, "1234567890123");
    }

    #[test]
    fn test_parse() {
        let parsed = NormalizedIdentifier::parse("12345").unwrap();
        assert_eq!(parsed.raw, "12345");
        assert_eq!(parsed.value, "000012345");
        assert_eq!(parsed.kind, IdentifierKind::TaxId);
        assert!(NormalizedIdentifier::parse("n/a").is_none());
    }
}

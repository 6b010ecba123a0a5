use chrono::NaiveDateTime;

/// Типизированное значение ячейки, как его отдаёт загрузчик книги
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
    /// Формула с закэшированным результатом (если он был сохранён)
    Formula {
        formula: String,
        result: Option<Box<RawCell>>,
    },
    /// Rich text: runs in display order
    RichText(Vec<String>),
    Hyperlink {
        text: String,
        target: String,
    },
    /// Error marker such as `#DIV/0!`
    Error(String),
}

impl RawCell {
    pub fn text(value: impl Into<String>) -> Self {
        RawCell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        extract_text(self).is_empty()
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(value.to_string())
        }
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

/// Приводит ячейку к обычному тексту без пробелов по краям.
///
/// Никогда не возвращает заглушку вида "[object]": всё, что нельзя
/// показать как текст, становится пустой строкой.
pub fn extract_text(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty | RawCell::Error(_) => String::new(),
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Number(n) => format_number(*n),
        RawCell::Bool(b) => b.to_string(),
        RawCell::Date(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        RawCell::Formula { result, .. } => match result.as_deref() {
            Some(
                inner @ (RawCell::Text(_) | RawCell::Number(_) | RawCell::Bool(_) | RawCell::Date(_)),
            ) => extract_text(inner),
            // Вложенные объекты и ошибки в кэше формулы не показываем
            _ => String::new(),
        },
        RawCell::RichText(runs) => runs.concat().trim().to_string(),
        RawCell::Hyperlink { text, .. } => text.trim().to_string(),
    }
}

/// Whole numbers print without a fractional part ("12345", not "12345.0")
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_extract_primitives() {
        assert_eq!(extract_text(&RawCell::text("  Ram  ")), "Ram");
        assert_eq!(extract_text(&RawCell::Number(12345.0)), "12345");
        assert_eq!(extract_text(&RawCell::Number(35000.5)), "35000.5");
        assert_eq!(extract_text(&RawCell::Bool(true)), "true");
        assert_eq!(extract_text(&RawCell::Empty), "");
    }

    #[test]
    fn test_extract_date_as_iso() {
        let dt = NaiveDate::from_ymd_opt(2024, 7, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(extract_text(&RawCell::Date(dt)), "2024-07-16T00:00:00");
    }

    #[test]
    fn test_extract_formula_result() {
        let cell = RawCell::Formula {
            formula: "SUM(A1:A3)".to_string(),
            result: Some(Box::new(RawCell::Number(42000.0))),
        };
        assert_eq!(extract_text(&cell), "42000");

        let nested = RawCell::Formula {
            formula: "A1".to_string(),
            result: Some(Box::new(RawCell::RichText(vec!["x".to_string()]))),
        };
        assert_eq!(extract_text(&nested), "");

        let error = RawCell::Formula {
            formula: "1/0".to_string(),
            result: Some(Box::new(RawCell::Error("#DIV/0!".to_string()))),
        };
        assert_eq!(extract_text(&error), "");

        let missing = RawCell::Formula {
            formula: "A1".to_string(),
            result: None,
        };
        assert_eq!(extract_text(&missing), "");
    }

    #[test]
    fn test_extract_rich_text_and_hyperlink() {
        let rich = RawCell::RichText(vec!["राम ".to_string(), "बहादुर".to_string()]);
        assert_eq!(extract_text(&rich), "राम बहादुर");

        let link = RawCell::Hyperlink {
            text: "Payroll".to_string(),
            target: "https://example.org".to_string(),
        };
        assert_eq!(extract_text(&link), "Payroll");
    }

    #[test]
    fn test_never_yields_object_marker() {
        for cell in [
            RawCell::Error("#REF!".to_string()),
            RawCell::Formula {
                formula: "X".to_string(),
                result: Some(Box::new(RawCell::Hyperlink {
                    text: "a".to_string(),
                    target: "b".to_string(),
                })),
            },
        ] {
            let text = extract_text(&cell);
            assert!(!text.contains("object"), "unexpected placeholder: {text}");
        }
    }
}

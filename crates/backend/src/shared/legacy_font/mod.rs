//! Конвертер legacy-шрифта Preeti в стандартный Unicode-деванагари.

pub mod detector;
pub mod tables;

use contracts::domain::a001_payroll_record::TransliteratedText;

pub use detector::is_legacy_encoded;
use tables::{
    PAIR_MAP, PRE_BASE_VOWEL_SIGN, REPH_SENTINEL, REPH_SEQUENCE, SEQUENCES, SINGLE_MAP,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransliterationResult {
    pub original: String,
    pub converted: String,
    pub was_converted: bool,
}

impl From<TransliterationResult> for TransliteratedText {
    fn from(result: TransliterationResult) -> Self {
        TransliteratedText {
            original: result.original,
            converted: result.converted,
        }
    }
}

/// Определяет кодировку и при необходимости конвертирует.
/// Текст в деванагари и всё, что не прошло детектор, возвращается как есть.
pub fn transliterate(text: &str) -> TransliterationResult {
    if !is_legacy_encoded(text) {
        return TransliterationResult {
            original: text.to_string(),
            converted: text.to_string(),
            was_converted: false,
        };
    }
    let converted = convert(text);
    TransliterationResult {
        original: text.to_string(),
        was_converted: converted != text,
        converted,
    }
}

/// Безусловная конвертация (без детектора)
pub fn convert(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in SEQUENCES {
        out = out.replace(from, to);
    }
    let out = reposition(&out);
    let out = map_glyphs(&out);
    collapse_vowel_signs(&out)
}

/// Шаг 2: (reph, согласный) -> (согласный, "र्"); (ि, согласный) -> (согласный, ि)
pub(crate) fn reposition(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match chars.get(i + 1) {
            Some(&next) if c == REPH_SENTINEL && is_consonant(next) => {
                out.push(next);
                out.push_str(REPH_SEQUENCE);
                i += 2;
            }
            Some(&next) if c == PRE_BASE_VOWEL_SIGN && is_consonant(next) => {
                out.push(next);
                out.push(PRE_BASE_VOWEL_SIGN);
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Шаг 3: жадный проход слева направо, пара важнее одиночного глифа
fn map_glyphs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() * 3);
    let mut i = 0;
    while i < chars.len() {
        if i + 1 < chars.len() {
            let pair: String = chars[i..i + 2].iter().collect();
            if let Some(mapped) = PAIR_MAP.get(pair.as_str()) {
                out.push_str(mapped);
                i += 2;
                continue;
            }
        }
        match SINGLE_MAP.get(&chars[i]) {
            Some(mapped) => out.push_str(mapped),
            None => out.push(chars[i]),
        }
        i += 1;
    }
    out
}

fn is_vowel_sign(c: char) -> bool {
    ('\u{093E}'..='\u{094C}').contains(&c) || ('\u{0901}'..='\u{0903}').contains(&c)
}

/// Шаг 4: "ाा" -> "ा" и т.п.
fn collapse_vowel_signs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if prev == Some(c) && is_vowel_sign(c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Consonant glyph of the legacy layout, or a consonant already produced by step 1
fn is_consonant(c: char) -> bool {
    tables::CONSONANT_GLYPHS.contains(c) || ('\u{0915}'..='\u{0939}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_common_words() {
        assert_eq!(convert("/fd axfb'/"), "राम बहादुर");
        assert_eq!(convert("gfd"), "नाम");
        assert_eq!(convert("kfg g+="), "पान नं.");
        assert_eq!(convert("hDdf"), "जम्मा");
        assert_eq!(convert("tna"), "तलब");
    }

    #[test]
    fn test_sequence_order_matters() {
        assert_eq!(convert("cf}"), "औ");
        assert_eq!(convert("cf]"), "ओ");
        assert_eq!(convert("cfo"), "आय");
        assert_eq!(convert("O{Zj/"), "ईश्वर");
    }

    #[test]
    fn test_reph_is_moved_after_consonant() {
        assert_eq!(reposition("{k"), "kर्");
        assert_eq!(convert("{k"), "पर्");
        // sentinel without a following consonant maps as a plain glyph
        assert_eq!(convert("{"), "र्");
    }

    #[test]
    fn test_pre_base_vowel_sign() {
        assert_eq!(convert("ljefu"), "विभाग");
        assert_eq!(convert("lbg"), "दिन");
    }

    #[test]
    fn test_pair_preferred_over_single() {
        assert_eq!(convert("sf]"), "को");
        assert_eq!(convert("If"), "क्ष");
    }

    #[test]
    fn test_repeated_vowel_signs_collapse() {
        assert_eq!(convert("s]]"), "के");
        assert_eq!(collapse_vowel_signs("काा"), "का");
        // consonants are never collapsed
        assert_eq!(collapse_vowel_signs("कक"), "कक");
    }

    #[test]
    fn test_transliterate_skips_devanagari() {
        let result = transliterate("राम /fd");
        assert!(!result.was_converted);
        assert_eq!(result.converted, "राम /fd");
    }

    #[test]
    fn test_transliterate_legacy_name() {
        let result = transliterate("/fd axfb'/");
        assert!(result.was_converted);
        assert_eq!(result.original, "/fd axfb'/");
        assert_eq!(result.converted, "राम बहादुर");

        let text: TransliteratedText = result.into();
        assert!(text.was_converted());
    }

    #[test]
    fn test_transliterate_passes_english_through() {
        let result = transliterate("Sita Kumari");
        assert!(!result.was_converted);
        assert_eq!(result.converted, "Sita Kumari");

        for label in ["Ward 5", "Admin/Finance", "Driver (Grade 2)", "D'Souza"] {
            let result = transliterate(label);
            assert!(!result.was_converted, "{label}");
            assert_eq!(result.converted, label);
        }
    }
}

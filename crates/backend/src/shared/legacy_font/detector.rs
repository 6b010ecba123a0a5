use super::tables::{
    CONSONANT_GLYPHS, DIAGNOSTIC_CAPITALS, DIAGNOSTIC_EXTENDED, NUMERAL_GLYPHS, RA_MARKER,
    VOWEL_SIGN_MARKERS,
};

/// Сколько структурных признаков нужно, чтобы считать текст набранным в Preeti
pub const MIN_SIGNALS: usize = 2;

/// Короткие служебные слова, которые пишут строчными в английских подписях
const ENGLISH_STOPWORDS: &[&str] = &["and", "of", "the", "for", "in", "to"];

pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(is_devanagari)
}

/// Текст в legacy-кодировке: нет ни одного символа деванагари и
/// выполняется минимум два структурных признака.
pub fn is_legacy_encoded(text: &str) -> bool {
    if text.trim().is_empty() || contains_devanagari(text) {
        return false;
    }
    signal_count(text) >= MIN_SIGNALS
}

pub(crate) fn signal_count(text: &str) -> usize {
    let english = reads_as_english(text);
    [
        has_consonant_run(text),
        text.chars()
            .any(|c| VOWEL_SIGN_MARKERS.contains(c) && !(english && c == '\'')),
        !english && text.chars().any(|c| NUMERAL_GLYPHS.contains(c)),
        has_diagnostic_capital(text, english),
        !english && text.contains(RA_MARKER),
    ]
    .iter()
    .filter(|hit| **hit)
    .count()
}

/// Латинский текст из обычных слов ("Ward 5", "Admin/Finance", "D'Souza"):
/// цифры, '/', апостроф и F/L/M внутри слова в нём признаками не считаются
fn reads_as_english(text: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| !word.is_empty())
        .all(is_english_word)
}

/// Инициал, аббревиатура, слово с заглавной и гласной, или служебное слово
fn is_english_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let tail = chars.as_str();
    if !first.is_ascii_uppercase() {
        return ENGLISH_STOPWORDS.contains(&word);
    }
    tail.is_empty()
        || tail.chars().all(|c| c.is_ascii_uppercase())
        || (tail.chars().all(|c| c.is_ascii_lowercase())
            && tail.chars().any(|c| "aeiouy".contains(c)))
}

fn has_consonant_run(text: &str) -> bool {
    let mut run = 0;
    for c in text.chars() {
        if CONSONANT_GLYPHS.contains(c) {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// F/L/M count only inside a word: a leading capital is just English
fn has_diagnostic_capital(text: &str, english: bool) -> bool {
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if DIAGNOSTIC_EXTENDED.contains(c) {
            return true;
        }
        if !english
            && DIAGNOSTIC_CAPITALS.contains(c)
            && prev.is_some_and(|p| !p.is_whitespace())
        {
            return true;
        }
        prev = Some(c);
    }
    false
}

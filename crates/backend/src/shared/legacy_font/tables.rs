//! Таблицы шрифта Preeti (однобайтовая раскладка деванагари).
//!
//! Все таблицы статические. Порядок в `SEQUENCES` значим:
//! более длинные и специфичные последовательности идут первыми.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Шаг 1: многосимвольные замены, применяются по порядку через replace-all
pub const SEQUENCES: &[(&str, &str)] = &[
    // независимые гласные, собранные из нескольких глифов
    ("cf}", "औ"),
    ("cf]", "ओ"),
    ("cf", "आ"),
    ("P]", "ऐ"),
    ("O{", "ई"),
    ("pm", "ऊ"),
    // согласные, у которых нет отдельного глифа
    ("qm", "क्त"),
    ("km", "फ"),
    ("Km", "फ्"),
    ("em", "झ"),
    ("Em", "झ्"),
];

/// Шаг 2: знак reph в этой раскладке стоит перед своим согласным
pub const REPH_SENTINEL: char = '{';
pub const REPH_SEQUENCE: &str = "र्";

/// Short i (ि) is typed before the consonant it follows in standard script
pub const PRE_BASE_VOWEL_SIGN: char = 'l';

/// Шаг 3: двухсимвольные сочетания (проверяются раньше одиночных)
pub const PAIRS: &[(&str, &str)] = &[
    ("f]", "ो"),
    ("f}", "ौ"),
    ("If", "क्ष"),
    ("if", "ष"),
    ("¡f", "ज्ञ"),
    ("£f", "घ"),
    ("ˆf", "फ"),
    ("‰f", "झ"),
    ("Œf", "त्त"),
];

/// Шаг 3: одиночные глифы
pub const SINGLES: &[(char, &str)] = &[
    ('a', "ब"),
    ('b', "द"),
    ('c', "अ"),
    ('d', "म"),
    ('e', "भ"),
    ('f', "ा"),
    ('g', "न"),
    ('h', "ज"),
    ('i', "ष्"),
    ('j', "व"),
    ('k', "प"),
    ('l', "ि"),
    ('m', "ः"),
    ('n', "ल"),
    ('o', "य"),
    ('p', "उ"),
    ('q', "त्र"),
    ('r', "च"),
    ('s', "क"),
    ('t', "त"),
    ('u', "ग"),
    ('v', "ख"),
    ('w', "ध"),
    ('x', "ह"),
    ('y', "थ"),
    ('z', "श"),
    ('A', "ब्"),
    ('B', "द्य"),
    ('C', "ऋ"),
    ('D', "म्"),
    ('E', "भ्"),
    ('F', "ँ"),
    ('G', "न्"),
    ('H', "ज्"),
    ('I', "क्ष्"),
    ('J', "व्"),
    ('K', "प्"),
    ('L', "ी"),
    ('M', "ः"),
    ('N', "ल्"),
    ('O', "इ"),
    ('P', "ए"),
    ('Q', "त्त"),
    ('R', "च्"),
    ('S', "क्"),
    ('T', "त्"),
    ('U', "ग्"),
    ('V', "ख्"),
    ('W', "ध्"),
    ('X', "ह्"),
    ('Y', "थ्"),
    ('Z', "श्"),
    ('0', "०"),
    ('1', "१"),
    ('2', "२"),
    ('3', "३"),
    ('4', "४"),
    ('5', "५"),
    ('6', "६"),
    ('7', "७"),
    ('8', "८"),
    ('9', "९"),
    ('!', "ज्ञ"),
    ('@', "ई"),
    ('#', "घ"),
    ('$', "द्ध"),
    ('%', "छ"),
    ('^', "ट"),
    ('&', "ठ"),
    ('*', "ड"),
    ('(', "ढ"),
    (')', "ण्"),
    ('-', "("),
    ('_', ")"),
    ('=', "."),
    ('+', "ं"),
    ('[', "ृ"),
    (']', "े"),
    ('{', "र्"),
    ('}', "ै"),
    ('\\', "्"),
    ('|', "्र"),
    (';', "स"),
    (':', "स्"),
    ('\'', "ु"),
    ('"', "ू"),
    ('<', "?"),
    ('.', "।"),
    ('>', "श्र"),
    ('/', "र"),
    ('?', "रु"),
    ('`', "ञ्"),
    ('~', "ञ्"),
    ('¡', "ज्ञ्"),
    ('¢', "द्घ"),
    ('£', "घ्"),
    ('¤', "झ्"),
    ('§', "ट्ट"),
    ('°', "ङ्ढ"),
    ('¶', "ठ्ठ"),
    ('¿', "रू"),
    ('Å', "हृ"),
    ('Ë', "ङ्ग"),
    ('Ì', "न्न"),
    ('Í', "ङ्क"),
    ('Î', "ङ्ख"),
    ('Ô', "क्ष"),
    ('Ø', "्य"),
    ('Ý', "ट्ठ"),
    ('ß', "द्म"),
    ('å', "द्व"),
    ('ª', "ङ"),
    ('ç', "ॐ"),
    ('ˆ', "फ्"),
    ('‰', "झ्"),
    ('Œ', "त्त्"),
    ('•', "ड्ड"),
    ('‹', "ङ्घ"),
    ('›', "द्र"),
];

/// Глифы, которые отображаются в согласный (полный или половинный)
pub const CONSONANT_GLYPHS: &str = "abdeghijknoqrstuvwxyzABDEGHIJKNQRSTUVWXYZ!#$%^&*();:>/?`~";

/// Глифы огласовок, которые в обычном тексте почти не встречаются
pub const VOWEL_SIGN_MARKERS: &str = "[]}\\|'\"";

pub const NUMERAL_GLYPHS: &str = "0123456789";

/// Заглавные, которые в раскладке являются диакритикой (ँ ी ः)
pub const DIAGNOSTIC_CAPITALS: &str = "FLM";

/// Extended glyphs that only show up in legacy-font text
pub const DIAGNOSTIC_EXTENDED: &str = "¡¢£¤§°¶¿ÅËÌÍÎÔØÝßåªçˆ‰Œ•‹›";

/// Глиф «र»
pub const RA_MARKER: char = '/';

pub static SINGLE_MAP: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| SINGLES.iter().copied().collect());

pub static PAIR_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| PAIRS.iter().copied().collect());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_longest_first_within_shared_prefix() {
        // "cf" must come after every longer sequence that starts with it
        let cf = SEQUENCES.iter().position(|(s, _)| *s == "cf").unwrap();
        for (idx, (seq, _)) in SEQUENCES.iter().enumerate() {
            if seq.starts_with("cf") && *seq != "cf" {
                assert!(idx < cf, "{seq} must precede cf");
            }
        }
    }

    #[test]
    fn test_tables_have_no_duplicate_keys() {
        assert_eq!(SINGLE_MAP.len(), SINGLES.len());
        assert_eq!(PAIR_MAP.len(), PAIRS.len());
        for (pair, _) in PAIRS {
            assert_eq!(pair.chars().count(), 2, "{pair}");
        }
    }
}

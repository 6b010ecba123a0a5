use serde::Deserialize;

/// Сколько первых строк листа просматривается в поисках заголовка
pub const HEADER_SCAN_ROWS: usize = 20;
/// Правдоподобный диапазон суммы к выплате (границы не включаются)
pub const SALARY_MIN: f64 = 1_000.0;
pub const SALARY_MAX: f64 = 10_000_000.0;
/// Допустимая длина имени при поиске по ячейкам, в символах
pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 99;
/// Сколько ключевых слов заголовка должно встретиться в строке данных, чтобы её пропустить
pub const STRAY_KEYWORD_DENSITY: usize = 3;
/// Сколько разобранных строк вернуть в ответе
pub const SAMPLE_LIMIT: usize = 100;
/// Minimum length of a digit token that may stand in for a missing identifier
pub const ACCOUNT_TOKEN_MIN_LEN: usize = 10;

/// Границы эвристик загрузки; секция `[ingest]` в config.toml
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub header_scan_rows: usize,
    pub salary_min: f64,
    pub salary_max: f64,
    pub name_min_chars: usize,
    pub name_max_chars: usize,
    pub stray_keyword_density: usize,
    pub sample_limit: usize,
    pub account_token_min_len: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            header_scan_rows: HEADER_SCAN_ROWS,
            salary_min: SALARY_MIN,
            salary_max: SALARY_MAX,
            name_min_chars: NAME_MIN_CHARS,
            name_max_chars: NAME_MAX_CHARS,
            stray_keyword_density: STRAY_KEYWORD_DENSITY,
            sample_limit: SAMPLE_LIMIT,
            account_token_min_len: ACCOUNT_TOKEN_MIN_LEN,
        }
    }
}

impl IngestSettings {
    pub fn is_plausible_salary(&self, value: f64) -> bool {
        value > self.salary_min && value < self.salary_max
    }

    pub fn is_plausible_name_len(&self, chars: usize) -> bool {
        (self.name_min_chars..=self.name_max_chars).contains(&chars)
    }
}

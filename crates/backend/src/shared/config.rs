use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::usecases::u601_payroll_upload::IngestSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ingest: IngestSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Директория для payroll.log; относительный путь считается от текущей директории
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "target/logs".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/payroll.db"

[logging]
dir = "target/logs"

[ingest]
header_scan_rows = 20
salary_min = 1000.0
salary_max = 10000000.0
name_min_chars = 3
name_max_chars = 99
stray_keyword_density = 3
sample_limit = 100
account_token_min_len = 10
"#;

/// Load configuration
///
/// Search order:
/// 1. Explicit path (`--config`); a missing file is an error
/// 2. config.toml next to the executable
/// 3. Embedded default config
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config {}: {}", path.display(), e))?;
        return parse_config(&contents);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            }
        }
    }

    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Get the database file path from configuration.
/// Relative paths are resolved against the current directory.
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path = Path::new(&config.database.path);
    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(db_path))
}

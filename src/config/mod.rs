use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::currency::CurrencyFormat;
use crate::errors::LedgerError;
use crate::ledger::{Ledger, LedgerQuery, SortKey, DEFAULT_UNCATEGORIZED_LABEL};

const APP_DIR: &str = "ledger_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Display and query preferences shared by the host and the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency: CurrencyFormat,
    pub uncategorized_label: String,
    /// `chrono` format string used for statement dates.
    pub date_format: String,
    pub default_sort: SortKey,
    pub default_ascending: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            uncategorized_label: DEFAULT_UNCATEGORIZED_LABEL.into(),
            date_format: "%d/%m/%Y".into(),
            default_sort: SortKey::Date,
            default_ascending: false,
        }
    }
}

impl Config {
    /// Empty ledger using the configured fallback label.
    pub fn new_ledger(&self) -> Ledger {
        Ledger::with_uncategorized_label(self.uncategorized_label.clone())
    }

    /// Query preset for the statement screen.
    pub fn default_query(&self) -> LedgerQuery {
        LedgerQuery {
            sort_by: Some(self.default_sort),
            ascending: Some(self.default_ascending),
            ..LedgerQuery::default()
        }
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.currency.decimal_separator.is_ascii_digit() {
            return Err(LedgerError::Config(format!(
                "decimal separator `{}` must not be a digit",
                self.currency.decimal_separator
            )));
        }
        if self.uncategorized_label.trim().is_empty() {
            return Err(LedgerError::Config(
                "uncategorized label must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Loads and stores [`Config`] as JSON in the platform config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        let base = dirs::config_dir()
            .ok_or_else(|| LedgerError::Config("no platform config directory".into()))?;
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let root = base.into().join(APP_DIR);
        fs::create_dir_all(&root)?;
        Ok(Self {
            path: root.join(CONFIG_FILE),
        })
    }

    /// Reads the stored config, falling back to defaults when none exists.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        info!(path = %self.path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let config = Config {
            uncategorized_label: "no category".into(),
            default_sort: SortKey::Amount,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert!(manager.path().ends_with("ledger_core/config.json"));
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        fs::write(manager.path(), r#"{"date_format":"%Y-%m-%d"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.currency.symbol, "R$");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let config = Config {
            uncategorized_label: " ".into(),
            ..Config::default()
        };
        assert!(matches!(
            manager.save(&config),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let query = Config::default().default_query();
        assert_eq!(query.sort_by, Some(SortKey::Date));
        assert!(!query.is_ascending());
    }
}

//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the libcard application.

use std::path::Path;

use libcard_protocol::TransferMode;
use serde::{Deserialize, Serialize};

use crate::card::CardConfig;
use crate::error::{ConfigError, Result};
use crate::ledger::LedgerConfig;
use crate::persistence::{find_config_file, read_config_file, write_config_file};

/// Environment variable overriding `ledger.url`.
pub const LEDGER_URL_ENV: &str = "LIBCARD_LEDGER_URL";

/// Environment variable overriding `ledger.student_id`.
pub const STUDENT_ID_ENV: &str = "LIBCARD_STUDENT_ID";

/// Environment variable overriding `card.transfer_mode`.
pub const TRANSFER_MODE_ENV: &str = "LIBCARD_TRANSFER_MODE";

/// The main configuration struct for the libcard application.
///
/// # Examples
///
/// ```
/// use libcard_config::{CardConfig, Config, LedgerConfig};
///
/// let config = Config::default();
/// assert!(!config.ledger.is_remote());
///
/// let config = Config {
///     ledger: LedgerConfig {
///         url: Some("https://library.example.edu/api".to_string()),
///         student_id: "2024-00117".to_string(),
///         ..LedgerConfig::default()
///     },
///     card: CardConfig { columns: 2, ..CardConfig::default() },
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ledger connection settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Card layout and interaction settings.
    #[serde(default)]
    pub card: CardConfig,
}

impl Config {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations, then applies
    /// environment overrides.
    ///
    /// If no configuration file is found, defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is found but cannot be read or parsed, an
    /// override is unusable, or the result fails validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libcard_config::Config;
    ///
    /// # fn example() -> libcard_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("{} columns", config.card.columns);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => read_config_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file. No overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first card or ledger setting that is out of range.
    pub fn validate(&self) -> Result<()> {
        self.card.validate()?;
        self.ledger.validate()?;
        Ok(())
    }

    /// Applies `LIBCARD_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for an unknown transfer mode.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup`, which maps a variable name
    /// to its value. Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for an unknown transfer mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_config::Config;
    /// use libcard_protocol::TransferMode;
    ///
    /// let mut config = Config::default();
    /// config
    ///     .apply_overrides(|name| (name == "LIBCARD_TRANSFER_MODE").then(|| "copy".to_string()))
    ///     .unwrap();
    /// assert_eq!(config.card.transfer_mode, TransferMode::Copy);
    /// ```
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(LEDGER_URL_ENV) {
            self.ledger.url = Some(url.trim().to_string());
        }
        if let Some(student_id) = get(STUDENT_ID_ENV) {
            self.ledger.student_id = student_id.trim().to_string();
        }
        if let Some(mode) = get(TRANSFER_MODE_ENV) {
            self.card.transfer_mode = mode
                .parse::<TransferMode>()
                .map_err(|reason| ConfigError::InvalidEnv {
                    name: TRANSFER_MODE_ENV,
                    reason,
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcard_protocol::GridMode;
    use tempfile::TempDir;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.ledger.url.is_none());
        assert_eq!(config.card, CardConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn new_config() {
        assert_eq!(Config::new(), Config::default());
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"card": {"mode": "viewer"}}"#).unwrap();
        assert_eq!(config.card.mode, GridMode::Viewer);
        assert_eq!(config.card.columns, 4);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                (LEDGER_URL_ENV, "https://lib.example.edu/api"),
                (STUDENT_ID_ENV, " 2024-00117 "),
                (TRANSFER_MODE_ENV, "COPY"),
            ]))
            .unwrap();

        assert_eq!(config.ledger.url.as_deref(), Some("https://lib.example.edu/api"));
        assert_eq!(config.ledger.student_id, "2024-00117");
        assert_eq!(config.card.transfer_mode, TransferMode::Copy);
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[(LEDGER_URL_ENV, ""), (TRANSFER_MODE_ENV, "  ")]))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_transfer_mode_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[(TRANSFER_MODE_ENV, "swap")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: TRANSFER_MODE_ENV,
                ..
            }
        ));
    }

    #[test]
    fn validate_checks_both_sections() {
        let config = Config {
            ledger: LedgerConfig {
                url: Some("lib.example.edu".to_string()),
                student_id: "s".to_string(),
                ..LedgerConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLedger { .. })));
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("libcard.json5");
        std::fs::write(
            &path,
            r#"
            {
                ledger: {
                    url: "https://lib.example.edu/api",
                    student_id: "2024-00117",
                    timeout_secs: 10,
                },
                card: { columns: 3, transfer_mode: "copy" },
            }
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.ledger.student_id, "2024-00117");
        assert_eq!(config.ledger.timeout_secs, 10);
        assert_eq!(config.card.columns, 3);
        assert_eq!(config.card.transfer_mode, TransferMode::Copy);
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("libcard.json");
        std::fs::write(&path, r#"{"card": {"columns": 40}}"#).unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidCard { .. })
        ));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let original = Config {
            ledger: LedgerConfig {
                url: Some("http://localhost:8000/api".to_string()),
                student_id: "s-9".to_string(),
                api_key: Some("key".to_string()),
                timeout_secs: 5,
            },
            card: CardConfig {
                start_number: 37,
                transfer_mode: TransferMode::Copy,
                ..CardConfig::default()
            },
        };

        original.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), original);
    }
}

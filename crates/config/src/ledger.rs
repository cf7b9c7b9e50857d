//! Ledger connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest allowed per-request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Where the borrowing ledger lives.
///
/// Without a `url` the application runs against a built-in demo ledger.
///
/// # Examples
///
/// ```
/// use libcard_config::LedgerConfig;
///
/// let ledger = LedgerConfig::default();
/// assert!(!ledger.is_remote());
///
/// let ledger = LedgerConfig {
///     url: Some("https://library.example.edu/api".to_string()),
///     student_id: "2024-00117".to_string(),
///     ..LedgerConfig::default()
/// };
/// assert!(ledger.is_remote());
/// assert!(ledger.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// API root of the ledger backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Student whose card is shown.
    #[serde(default)]
    pub student_id: String,

    /// Bearer token for the API.
    ///
    /// If not set, `LIBCARD_API_KEY` is consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            url: None,
            student_id: String::new(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LedgerConfig {
    /// Returns `true` if a backend URL is configured.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.url.is_some()
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks the URL scheme, the student id and the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLedger`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(ConfigError::InvalidLedger { reason });

        if !(1..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return invalid(format!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            ));
        }
        if let Some(url) = &self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return invalid(format!("url must start with http:// or https://, got {url:?}"));
            }
            if self.student_id.trim().is_empty() {
                return invalid("student_id is required when a url is set".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(url: &str) -> LedgerConfig {
        LedgerConfig {
            url: Some(url.to_string()),
            student_id: "s-1".to_string(),
            ..LedgerConfig::default()
        }
    }

    #[test]
    fn default_is_offline() {
        let ledger = LedgerConfig::default();
        assert!(!ledger.is_remote());
        assert_eq!(ledger.timeout(), Duration::from_secs(30));
        assert!(ledger.validate().is_ok());
    }

    #[test]
    fn url_scheme_is_checked() {
        assert!(remote("https://lib.example.edu").validate().is_ok());
        assert!(remote("http://localhost:8000/api").validate().is_ok());
        assert!(matches!(
            remote("ftp://lib.example.edu").validate(),
            Err(ConfigError::InvalidLedger { .. })
        ));
    }

    #[test]
    fn student_id_required_for_remote() {
        let ledger = LedgerConfig {
            student_id: "  ".to_string(),
            ..remote("https://lib.example.edu")
        };
        assert!(ledger.validate().is_err());
    }

    #[test]
    fn timeout_bounds() {
        let zero = LedgerConfig {
            timeout_secs: 0,
            ..LedgerConfig::default()
        };
        let long = LedgerConfig {
            timeout_secs: 301,
            ..LedgerConfig::default()
        };
        assert!(zero.validate().is_err());
        assert!(long.validate().is_err());
    }

    #[test]
    fn api_key_not_serialized_when_none() {
        let json = serde_json::to_string(&LedgerConfig::default()).unwrap();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("url"));
    }
}

//! Ledger API key resolution.
//!
//! This module provides key resolution with fallback chain:
//!
//! 1. `ledger.api_key` from config
//! 2. `LIBCARD_API_KEY` environment variable
//! 3. Unauthenticated (returns `None`)

use secrecy::SecretString;

/// Environment variable holding the ledger API key.
pub const API_KEY_ENV: &str = "LIBCARD_API_KEY";

/// Resolves the ledger API key from config, then the environment.
///
/// Blank values are treated as absent.
///
/// # Examples
///
/// ```
/// use libcard_config::auth::resolve_api_key;
/// use secrecy::ExposeSecret;
///
/// let key = resolve_api_key(Some("from-config")).unwrap();
/// assert_eq!(key.expose_secret(), "from-config");
/// ```
#[must_use]
pub fn resolve_api_key(config_key: Option<&str>) -> Option<SecretString> {
    resolve_api_key_with(config_key, std::env::var(API_KEY_ENV).ok())
}

/// Resolves the API key against an explicit environment value.
#[must_use]
pub fn resolve_api_key_with(
    config_key: Option<&str>,
    env_key: Option<String>,
) -> Option<SecretString> {
    config_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| env_key.map(|key| key.trim().to_string()).filter(|key| !key.is_empty()))
        .map(SecretString::from)
}

//! Config file discovery, reading and writing, plus the log file location.
//!
//! # File Formats
//!
//! JSON5 (`.json5`) is preferred since it allows comments next to a
//! student id or ledger URL. Plain JSON (`.json`) is read by the same
//! parser. Files are always written back as pretty JSON.
//!
//! # File Locations
//!
//! Configuration is searched in the following order:
//!
//! 1. Local: `./libcard.json5` or `./libcard.json`
//! 2. User: `~/.config/libcard/config.json5` or `~/.config/libcard/config.json`

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Configuration file names to search for in the working directory.
const LOCAL_FILE_NAMES: &[&str] = &["libcard.json5", "libcard.json"];

/// Application directory under the platform config and data directories.
const APP_DIR: &str = "libcard";

/// Configuration file names to search for in the user config directory.
const USER_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Default log file name.
const LOG_FILE_NAME: &str = "libcard.log";

/// Environment variable overriding the log file location.
pub const LOG_FILE_ENV: &str = "LIBCARD_LOG_FILE";

/// Lists every place a config file may live, in priority order.
///
/// `local_dir` is usually the working directory and `user_dir` the platform
/// config directory, when there is one.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use libcard_config::persistence::config_candidates;
///
/// let candidates = config_candidates(Path::new("."), Some(Path::new("/home/a/.config")));
/// assert_eq!(candidates[0], Path::new("./libcard.json5"));
/// assert_eq!(candidates[3], Path::new("/home/a/.config/libcard/config.json"));
/// ```
#[must_use]
pub fn config_candidates(local_dir: &Path, user_dir: Option<&Path>) -> Vec<PathBuf> {
    let local = LOCAL_FILE_NAMES.iter().map(|name| local_dir.join(name));
    let user = user_dir
        .map(|dir| dir.join(APP_DIR))
        .into_iter()
        .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(name)));
    local.chain(user).collect()
}

/// Finds the configuration file path, if any exists.
///
/// # Examples
///
/// ```no_run
/// use libcard_config::persistence::find_config_file;
///
/// if let Some(path) = find_config_file() {
///     println!("Found config at: {}", path.display());
/// }
/// ```
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let user_dir = dirs::config_dir();
    config_candidates(Path::new("."), user_dir.as_deref())
        .into_iter()
        .find(|path| path.exists())
}

/// Returns the default user configuration directory.
///
/// This is typically `~/.config/libcard/` on Unix systems.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the default user configuration file path.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_user_config_path() -> Result<PathBuf> {
    Ok(user_config_dir()?.join("config.json5"))
}

/// Returns where the log file should be written.
///
/// `LIBCARD_LOG_FILE` wins when set; otherwise `libcard.log` in the user
/// data directory.
///
/// # Errors
///
/// Returns an error if no override is set and the home directory cannot be
/// determined.
pub fn log_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR).join(LOG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a configuration file. JSON5 and JSON are both accepted.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a configuration to a file as pretty JSON, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written, or the
/// value cannot be serialized.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(config)?;

    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

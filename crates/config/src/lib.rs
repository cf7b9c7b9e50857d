//! Configuration management for the libcard application.
//!
//! This crate handles loading, validating, and persisting configuration
//! from multiple sources (files, environment variables, defaults).
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`card`]: Card layout, display width, and transfer mode
//! - [`ledger`]: Ledger backend connection settings
//! - [`auth`]: Ledger API key resolution
//! - [`persistence`]: Config file discovery, reading, and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! Configuration is loaded from multiple sources with the following priority
//! (highest to lowest):
//!
//! 1. Environment variables (`LIBCARD_*`)
//! 2. Local config (`./libcard.json5` or `./libcard.json`)
//! 3. User config (`~/.config/libcard/config.json5` or `~/.config/libcard/config.json`)
//! 4. Built-in defaults
//!
//! # File Format
//!
//! ```json5
//! {
//!   ledger: {
//!     url: "https://library.example.edu/api",
//!     student_id: "2024-00117",
//!     // api_key may also come from LIBCARD_API_KEY
//!     timeout_secs: 30,
//!   },
//!   card: {
//!     columns: 4,
//!     rows_per_column: 9,
//!     start_number: 1,
//!     display_width: 17,
//!     transfer_mode: "move", // or "copy"
//!     mode: "editor",        // or "viewer"
//!   },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use libcard_config::Config;
//!
//! # fn example() -> libcard_config::Result<()> {
//! let config = Config::load()?;
//! match &config.ledger.url {
//!     Some(url) => println!("Ledger at {url}"),
//!     None => println!("Running against the demo ledger"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod card;
pub mod config;
pub mod error;
pub mod ledger;
pub mod persistence;

// Re-export primary types at crate root for convenience
pub use card::CardConfig;
pub use config::Config;
pub use error::{ConfigError, Result};
pub use ledger::LedgerConfig;

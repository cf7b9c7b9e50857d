//! Card layout and interaction settings.
//!
//! This module provides [`CardConfig`]: how many columns and rows a card
//! has, where its numbering starts, how much of each cell is shown, and how
//! drags behave.

use libcard_protocol::{CardLayout, DISPLAY_WIDTH, GridMode, TransferMode};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default number of columns on a card.
pub const DEFAULT_COLUMNS: u16 = 4;

/// Default number of cells per column.
pub const DEFAULT_ROWS_PER_COLUMN: u16 = 9;

/// Largest supported number of columns.
pub const MAX_COLUMNS: u16 = 12;

/// Largest supported number of cells per column.
pub const MAX_ROWS_PER_COLUMN: u16 = 50;

/// Narrowest display width that still leaves room for the ellipsis.
pub const MIN_DISPLAY_WIDTH: usize = 4;

/// Card settings.
///
/// # Examples
///
/// ```
/// use libcard_config::CardConfig;
/// use libcard_protocol::TransferMode;
///
/// let card = CardConfig::default();
/// assert_eq!(card.layout().capacity(), 36);
/// assert_eq!(card.transfer_mode, TransferMode::Move);
/// assert!(card.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Number of columns.
    #[serde(default = "default_columns")]
    pub columns: u16,

    /// Cells in each column.
    #[serde(default = "default_rows_per_column")]
    pub rows_per_column: u16,

    /// Placing number of the first cell.
    #[serde(default = "default_start_number")]
    pub start_number: u32,

    /// Characters shown before a cell's text is truncated.
    #[serde(default = "default_display_width")]
    pub display_width: usize,

    /// Whether drops copy or move.
    #[serde(default)]
    pub transfer_mode: TransferMode,

    /// Editor or viewer.
    #[serde(default)]
    pub mode: GridMode,
}

fn default_columns() -> u16 {
    DEFAULT_COLUMNS
}

fn default_rows_per_column() -> u16 {
    DEFAULT_ROWS_PER_COLUMN
}

fn default_start_number() -> u32 {
    1
}

fn default_display_width() -> usize {
    DISPLAY_WIDTH
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows_per_column: DEFAULT_ROWS_PER_COLUMN,
            start_number: 1,
            display_width: DISPLAY_WIDTH,
            transfer_mode: TransferMode::default(),
            mode: GridMode::default(),
        }
    }
}

impl CardConfig {
    /// The grid layout these settings describe.
    #[must_use]
    pub fn layout(&self) -> CardLayout {
        CardLayout::new(self.columns, self.rows_per_column, self.start_number)
    }

    /// Checks that every value is within range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCard`] naming the first bad value.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_config::CardConfig;
    ///
    /// let card = CardConfig { columns: 0, ..CardConfig::default() };
    /// assert!(card.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(ConfigError::InvalidCard { reason });

        if !(1..=MAX_COLUMNS).contains(&self.columns) {
            return invalid(format!(
                "columns must be between 1 and {MAX_COLUMNS}, got {}",
                self.columns
            ));
        }
        if !(1..=MAX_ROWS_PER_COLUMN).contains(&self.rows_per_column) {
            return invalid(format!(
                "rows_per_column must be between 1 and {MAX_ROWS_PER_COLUMN}, got {}",
                self.rows_per_column
            ));
        }
        if self.start_number < 1 {
            return invalid("start_number must be at least 1".to_string());
        }
        if self.display_width < MIN_DISPLAY_WIDTH {
            return invalid(format!(
                "display_width must be at least {MIN_DISPLAY_WIDTH}, got {}",
                self.display_width
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_printed_card() {
        let card = CardConfig::default();
        assert_eq!(card.columns, 4);
        assert_eq!(card.rows_per_column, 9);
        assert_eq!(card.display_width, 17);
        assert_eq!(card.mode, GridMode::Editor);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let card: CardConfig = serde_json::from_str(r#"{"columns": 2, "transfer_mode": "copy"}"#).unwrap();
        assert_eq!(card.columns, 2);
        assert_eq!(card.rows_per_column, 9);
        assert_eq!(card.transfer_mode, TransferMode::Copy);
    }

    #[test]
    fn layout_uses_start_number() {
        let card = CardConfig {
            start_number: 37,
            ..CardConfig::default()
        };
        assert_eq!(card.layout().placing_at(0, 0), 37);
    }

    #[test]
    fn validate_rejects_each_bad_value() {
        let cases = [
            CardConfig {
                columns: 13,
                ..CardConfig::default()
            },
            CardConfig {
                rows_per_column: 0,
                ..CardConfig::default()
            },
            CardConfig {
                start_number: 0,
                ..CardConfig::default()
            },
            CardConfig {
                display_width: 3,
                ..CardConfig::default()
            },
        ];
        for card in cases {
            assert!(
                matches!(card.validate(), Err(ConfigError::InvalidCard { .. })),
                "{card:?} should be rejected"
            );
        }
    }

    #[test]
    fn validate_accepts_bounds() {
        let card = CardConfig {
            columns: MAX_COLUMNS,
            rows_per_column: MAX_ROWS_PER_COLUMN,
            display_width: MIN_DISPLAY_WIDTH,
            ..CardConfig::default()
        };
        assert!(card.validate().is_ok());
    }
}

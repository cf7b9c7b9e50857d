//! Cell content model.
//!
//! A cell holds free text and a struck-through flag. Text written from a
//! ledger record carries the status keyword on its first line and the date
//! on the next; the keyword line is hidden when the cell is rendered.

use serde::{Deserialize, Serialize};

use crate::record::RecordType;

/// Number of characters shown in a cell before truncation.
pub const DISPLAY_WIDTH: usize = 17;

/// Marker appended to truncated cell text.
pub const ELLIPSIS: &str = "...";

/// One line slot on a library card.
///
/// # Examples
///
/// ```
/// use libcard_protocol::Cell;
///
/// let cell = Cell::new("BORROWED\n2024-05-01");
/// assert_eq!(cell.render(), "2024-05-01");
/// assert!(!cell.is_struck_through);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Raw cell text. May embed a status keyword and a date on separate lines.
    pub value: String,
    /// Whether the cell is drawn struck through.
    #[serde(default)]
    pub is_struck_through: bool,
}

impl Cell {
    /// Creates a cell holding `value`, not struck through.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_struck_through: false,
        }
    }

    /// Returns `true` if the cell holds no visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Flips the struck-through flag. The value is left alone.
    pub fn toggle_strike(&mut self) {
        self.is_struck_through = !self.is_struck_through;
    }

    /// Renders the cell at the default [`DISPLAY_WIDTH`].
    #[must_use]
    pub fn render(&self) -> String {
        render_value(&self.value, DISPLAY_WIDTH)
    }

    /// Returns the status keyword on the first line, if any.
    #[must_use]
    pub fn status(&self) -> Option<RecordType> {
        status_keyword(&self.value)
    }
}

/// Returns the record type named by the first line of `value`, if that line
/// is exactly a status keyword (ignoring case).
///
/// # Examples
///
/// ```
/// use libcard_protocol::{RecordType, cell::status_keyword};
///
/// assert_eq!(status_keyword("returned\n2024-06-01"), Some(RecordType::Returned));
/// assert_eq!(status_keyword("Returned late\n2024-06-01"), None);
/// ```
#[must_use]
pub fn status_keyword(value: &str) -> Option<RecordType> {
    value.lines().next().and_then(RecordType::from_keyword)
}

/// Computes the text shown for a cell value.
///
/// - A value whose first line is a status keyword shows only the remaining
///   lines.
/// - Any other value is shown as-is, truncated to `width` characters with an
///   [`ELLIPSIS`] when longer.
/// - An empty value shows nothing.
///
/// # Examples
///
/// ```
/// use libcard_protocol::cell::render_value;
///
/// assert_eq!(render_value("BORROWED\n2024-05-01", 17), "2024-05-01");
/// assert_eq!(render_value("short note", 17), "short note");
/// assert_eq!(render_value("a rather long margin note", 17), "a rather long mar...");
/// assert_eq!(render_value("", 17), "");
/// ```
#[must_use]
pub fn render_value(value: &str, width: usize) -> String {
    if value.is_empty() {
        return String::new();
    }

    if status_keyword(value).is_some() {
        return match value.split_once('\n') {
            Some((_, rest)) => rest.to_string(),
            None => String::new(),
        };
    }

    truncate(value, width)
}

/// Truncates `text` to `width` characters, appending [`ELLIPSIS`] when
/// anything was cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_blank() {
        let cell = Cell::default();
        assert!(cell.is_blank());
        assert_eq!(cell.render(), "");
    }

    #[test]
    fn whitespace_only_cell_is_blank() {
        assert!(Cell::new("  \n ").is_blank());
    }

    #[test]
    fn toggle_strike_leaves_value_alone() {
        let mut cell = Cell::new("note");
        cell.toggle_strike();
        assert!(cell.is_struck_through);
        assert_eq!(cell.value, "note");
        cell.toggle_strike();
        assert!(!cell.is_struck_through);
    }

    #[test]
    fn empty_struck_cell_renders_empty() {
        let mut cell = Cell::default();
        cell.toggle_strike();
        assert_eq!(cell.render(), "");
    }

    #[test]
    fn keyword_only_value_renders_empty() {
        assert_eq!(render_value("CLEARED", DISPLAY_WIDTH), "");
    }

    #[test]
    fn lowercase_keyword_is_stripped() {
        assert_eq!(render_value("extended\n2024-07-04", DISPLAY_WIDTH), "2024-07-04");
    }

    #[test]
    fn only_first_keyword_line_is_stripped() {
        assert_eq!(
            render_value("BORROWED\nRETURNED\n2024-07-04", DISPLAY_WIDTH),
            "RETURNED\n2024-07-04"
        );
    }

    #[test]
    fn keyword_inside_text_is_not_stripped() {
        assert_eq!(render_value("was BORROWED", DISPLAY_WIDTH), "was BORROWED");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate("ñññññ", 3), "ñññ...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn cell_status_reads_first_line() {
        assert_eq!(Cell::new("ADDITION\n2024-01-01").status(), Some(RecordType::Addition));
        assert_eq!(Cell::new("hello").status(), None);
    }
}

//! Centralized layout measurements for the TUI.
//!
//! This module defines shared constants for layout dimensions used across
//! multiple rendering components, and the split of the screen into header,
//! card and status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the header bar in rows.
///
/// The header displays the application title and help cue.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the status bar in rows.
pub const STATUS_HEIGHT: u16 = 3;

/// Height of a fully drawn cell: a bordered box with two text lines.
///
/// Shorter rows fall back to one line per cell.
pub const CELL_HEIGHT: u16 = 4;

/// Minimum terminal height for useful rendering.
///
/// One line per cell of a default nine-row column, plus the status bar.
pub const MIN_HEIGHT: u16 = 9 + STATUS_HEIGHT;

/// Minimum terminal height for rendering with header.
///
/// When terminal height is between `MIN_HEIGHT` and `MIN_HEIGHT_WITH_HEADER`,
/// we hide the header to reclaim 3 rows of content space.
pub const MIN_HEIGHT_WITH_HEADER: u16 = MIN_HEIGHT + HEADER_HEIGHT;

/// Minimum terminal width for useful rendering.
///
/// Four columns of twelve characters: a slot number and a date.
pub const MIN_WIDTH: u16 = 48;

/// Where each part of the screen goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Header bar, when shown.
    pub header: Option<Rect>,
    /// The card grid.
    pub card: Rect,
    /// Status bar with hints and notices.
    pub status: Rect,
}

/// Splits `area` into header, card and status bar.
///
/// # Examples
///
/// ```
/// use ratatui::layout::Rect;
/// use libcard_tui::layout::screen_areas;
///
/// let areas = screen_areas(Rect::new(0, 0, 80, 24), true);
/// assert_eq!(areas.header.map(|h| h.height), Some(3));
/// assert_eq!(areas.card.y, 3);
/// assert_eq!(areas.status.height, 3);
/// ```
#[must_use]
pub fn screen_areas(area: Rect, header_visible: bool) -> ScreenAreas {
    if header_visible {
        let [header, card, status] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);
        ScreenAreas {
            header: Some(header),
            card,
            status,
        }
    } else {
        let [card, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(area);
        ScreenAreas {
            header: None,
            card,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_layout_gives_header_rows_to_the_card() {
        let area = Rect::new(0, 0, 80, MIN_HEIGHT);
        let areas = screen_areas(area, false);
        assert!(areas.header.is_none());
        assert_eq!(areas.card, Rect::new(0, 0, 80, 9));
        assert_eq!(areas.status, Rect::new(0, 9, 80, STATUS_HEIGHT));
    }
}

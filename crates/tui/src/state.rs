//! Application state management.
//!
//! This module defines the state behind the terminal card: the grid itself,
//! the keyboard cursor, the help overlay, and the queue of transient notices.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use libcard_protocol::{CardGrid, Notice, PlacingNumber};

/// How long a notice stays in the status bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(2);

/// Most notices kept at once; older ones are dropped.
const MAX_NOTICES: usize = 8;

/// A notice and the moment it was raised.
#[derive(Debug, Clone)]
pub struct ShownNotice {
    /// The notice.
    pub notice: Notice,
    /// When it was raised.
    pub shown_at: Instant,
}

/// The application state.
///
/// Contains all mutable state for the TUI application: the card grid, the
/// cursor position, and what is shown on top of the card.
#[derive(Debug)]
pub struct AppState {
    /// The card being displayed.
    pub grid: CardGrid,
    /// Cursor column (0-based).
    pub cursor_column: u16,
    /// Cursor row within the column (0-based).
    pub cursor_row: u16,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
    notices: VecDeque<ShownNotice>,
}

impl AppState {
    /// Creates a new application state with the cursor on the first cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_protocol::{CardGrid, CardLayout, IndexHandle, TransactionIndex};
    /// use libcard_tui::AppState;
    ///
    /// let grid = CardGrid::new(CardLayout::default(), IndexHandle::fixed(TransactionIndex::default()));
    /// let state = AppState::new(grid);
    /// assert_eq!(state.cursor_index(), 1);
    /// ```
    #[must_use]
    pub fn new(grid: CardGrid) -> Self {
        Self {
            grid,
            cursor_column: 0,
            cursor_row: 0,
            help_visible: false,
            notices: VecDeque::new(),
        }
    }

    /// Placing number under the cursor.
    #[must_use]
    pub fn cursor_index(&self) -> PlacingNumber {
        self.grid
            .layout()
            .placing_at(self.cursor_column, self.cursor_row)
    }

    /// Moves the cursor to placing number `n`. Returns `false` if `n` is not
    /// on the card.
    pub fn move_cursor_to(&mut self, n: PlacingNumber) -> bool {
        match self.grid.layout().position_of(n) {
            Some((column, row)) => {
                self.cursor_column = column;
                self.cursor_row = row;
                true
            }
            None => false,
        }
    }

    /// Toggles the help overlay visibility.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Dismisses the help overlay if it is visible.
    ///
    /// Returns `true` if help was visible and has been dismissed.
    #[must_use]
    pub fn dismiss_help(&mut self) -> bool {
        if self.help_visible {
            self.help_visible = false;
            true
        } else {
            false
        }
    }

    /// Moves the cursor one column left, stopping at the first column.
    pub fn navigate_left(&mut self) {
        self.cursor_column = self.cursor_column.saturating_sub(1);
    }

    /// Moves the cursor one column right, stopping at the last column.
    pub fn navigate_right(&mut self) {
        let last = self.grid.layout().columns.saturating_sub(1);
        self.cursor_column = (self.cursor_column + 1).min(last);
    }

    /// Moves the cursor to the previous slot, continuing at the bottom of
    /// the previous column.
    pub fn navigate_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
        } else if self.cursor_column > 0 {
            self.cursor_column -= 1;
            self.cursor_row = self.grid.layout().rows_per_column.saturating_sub(1);
        }
    }

    /// Moves the cursor to the next slot, continuing at the top of the next
    /// column.
    pub fn navigate_down(&mut self) {
        let layout = *self.grid.layout();
        if self.cursor_row + 1 < layout.rows_per_column {
            self.cursor_row += 1;
        } else if self.cursor_column + 1 < layout.columns {
            self.cursor_column += 1;
            self.cursor_row = 0;
        }
    }

    /// Queues a notice, stamped now.
    pub fn push_notice(&mut self, notice: Notice) {
        self.push_notice_at(notice, Instant::now());
    }

    /// Queues a notice raised at `shown_at`.
    pub fn push_notice_at(&mut self, notice: Notice, shown_at: Instant) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(ShownNotice { notice, shown_at });
    }

    /// Drops notices older than [`NOTICE_TTL`]. Returns `true` if any were
    /// dropped.
    pub fn expire_notices(&mut self, now: Instant) -> bool {
        let before = self.notices.len();
        self.notices
            .retain(|shown| now.saturating_duration_since(shown.shown_at) < NOTICE_TTL);
        self.notices.len() != before
    }

    /// The most recent notice still showing.
    #[must_use]
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.back().map(|shown| &shown.notice)
    }

    /// All notices still showing, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &ShownNotice> {
        self.notices.iter()
    }
}

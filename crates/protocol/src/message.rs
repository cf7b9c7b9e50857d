//! TUI message types for event handling.
//!
//! This module defines the message enum used for communication between
//! the TUI input handler and the application state.

use serde::{Deserialize, Serialize};

/// Messages that represent user actions in the TUI.
///
/// These messages are produced by the input handler and consumed by
/// the application state to update the card.
///
/// # Examples
///
/// ```
/// use libcard_protocol::Message;
///
/// let msg = Message::NavigateRight;
/// assert!(matches!(msg, Message::NavigateRight));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Move the cursor one column left.
    NavigateLeft,
    /// Move the cursor one column right.
    NavigateRight,
    /// Move the cursor one row up.
    NavigateUp,
    /// Move the cursor one row down.
    NavigateDown,
    /// Enter edit mode on the cursor cell, or commit the current edit.
    Activate,
    /// Escape: commit an edit, cancel a drag, or dismiss a dialog (contextual).
    Escape,
    /// Quit the application.
    Quit,
    /// Reload the ledger snapshot.
    Refresh,
    /// Toggle help overlay.
    ToggleHelp,

    // --- Cell messages ---
    /// Toggle strike-through on the cursor cell.
    ToggleStrike,
    /// Pick up the cursor cell, or drop what is being dragged onto it.
    PickUpOrDrop,
    /// Switch between copy and move transfers.
    ToggleTransferMode,
    /// Switch between editor and viewer mode.
    ToggleGridMode,
    /// Stamp today's date into the cursor cell.
    StampDate,
    /// Use the insert affordance of the cursor cell.
    Insert,
    /// Paste encoded drag data onto the cursor cell.
    PasteTransferData {
        /// The pasted text.
        data: String,
    },

    // --- Dialog messages ---
    /// Confirm the pending move.
    Confirm,
    /// Dismiss the pending move.
    Cancel,

    // --- Edit messages ---
    /// Input a character while editing.
    EditInput {
        /// The character that was input.
        ch: char,
    },
    /// Insert a line break while editing.
    EditNewline,
    /// Delete the last character while editing.
    EditBackspace,
    /// Pasted plain text while editing.
    EditPaste {
        /// The pasted text.
        text: String,
    },

    // --- Mouse messages ---
    /// Mouse button pressed at coordinates (column, row).
    MouseDown {
        /// Column (x coordinate) of the press.
        column: u16,
        /// Row (y coordinate) of the press.
        row: u16,
    },
    /// Mouse moved with the button held.
    MouseDrag {
        /// Column (x coordinate) of the pointer.
        column: u16,
        /// Row (y coordinate) of the pointer.
        row: u16,
    },
    /// Mouse button released.
    MouseUp {
        /// Column (x coordinate) of the release.
        column: u16,
        /// Row (y coordinate) of the release.
        row: u16,
    },
}

impl Message {
    /// Returns `true` if this message is a navigation action.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_protocol::Message;
    ///
    /// assert!(Message::NavigateLeft.is_navigation());
    /// assert!(Message::NavigateUp.is_navigation());
    /// assert!(!Message::Activate.is_navigation());
    /// ```
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::NavigateLeft | Self::NavigateRight | Self::NavigateUp | Self::NavigateDown
        )
    }

    /// Returns `true` if this message should terminate the application.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_protocol::Message;
    ///
    /// assert!(Message::Quit.is_terminating());
    /// assert!(!Message::Escape.is_terminating());
    /// ```
    #[must_use]
    pub fn is_terminating(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Returns `true` if this message only makes sense while a cell is being
    /// edited.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_protocol::Message;
    ///
    /// assert!(Message::EditInput { ch: 'a' }.is_edit());
    /// assert!(!Message::ToggleStrike.is_edit());
    /// ```
    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::EditInput { .. }
                | Self::EditNewline
                | Self::EditBackspace
                | Self::EditPaste { .. }
        )
    }

    /// Returns `true` if this message is a pointer event.
    #[must_use]
    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            Self::MouseDown { .. } | Self::MouseDrag { .. } | Self::MouseUp { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_navigation_detection() {
        assert!(Message::NavigateLeft.is_navigation());
        assert!(Message::NavigateRight.is_navigation());
        assert!(Message::NavigateUp.is_navigation());
        assert!(Message::NavigateDown.is_navigation());
        assert!(!Message::Activate.is_navigation());
        assert!(!Message::PickUpOrDrop.is_navigation());
        assert!(!Message::Quit.is_navigation());
    }

    #[test]
    fn message_terminating_detection() {
        assert!(Message::Quit.is_terminating());
        assert!(!Message::Escape.is_terminating());
        assert!(!Message::Cancel.is_terminating());
    }

    #[test]
    fn message_edit_and_mouse_detection() {
        assert!(Message::EditNewline.is_edit());
        assert!(Message::EditBackspace.is_edit());
        assert!(Message::EditPaste { text: "x".to_string() }.is_edit());
        assert!(!Message::Activate.is_edit());
        assert!(Message::MouseDrag { column: 1, row: 2 }.is_mouse());
        assert!(!Message::Confirm.is_mouse());
    }

    #[test]
    fn message_json_format() {
        let json = serde_json::to_string(&Message::PickUpOrDrop).expect("serialize");
        assert_eq!(json, r#""pick_up_or_drop""#);

        let json = serde_json::to_string(&Message::MouseUp { column: 3, row: 4 }).expect("serialize");
        assert_eq!(json, r#"{"mouse_up":{"column":3,"row":4}}"#);
    }
}

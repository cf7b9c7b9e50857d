//! Event handling and key mappings.
//!
//! This module provides event polling and conversion from terminal events
//! to application messages.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use libcard_protocol::Message;

/// Default poll timeout for events.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Polls for a terminal event with the default timeout.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL_TIMEOUT)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts an event (keyboard, mouse, or paste) to an application message.
///
/// `editing` selects the text-entry key map used while a cell is being
/// edited.
#[must_use]
pub fn event_to_message(event: &Event, editing: bool) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            if editing {
                key_to_edit_message(*key)
            } else {
                key_to_message(*key)
            }
        }
        Event::Mouse(mouse) => mouse_to_message(mouse),
        Event::Paste(data) if editing => Some(Message::EditPaste { text: data.clone() }),
        Event::Paste(data) => Some(Message::PasteTransferData { data: data.clone() }),
        _ => None,
    }
}

/// Converts a mouse event to an application message.
///
/// Only the left button is handled: press, drag and release.
#[must_use]
fn mouse_to_message(mouse: &MouseEvent) -> Option<Message> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Message::MouseDown { column, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Message::MouseDrag { column, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(Message::MouseUp { column, row }),
        _ => None,
    }
}

/// Converts a terminal key event to an application message.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `Ctrl+C` | Quit |
/// | `Esc` | Cancel drag or pending move |
/// | Arrows | Move the cursor (hover while dragging) |
/// | `Enter` | Edit the cursor cell |
/// | `Space` | Pick up / drop |
/// | `x` | Toggle strike-through |
/// | `y` / `n` | Confirm / cancel a pending move |
/// | `m` | Toggle copy/move |
/// | `g` | Toggle editor/viewer |
/// | `t` | Stamp today's date |
/// | `i` | Insert |
/// | `r` | Refresh from the ledger |
/// | `?` | Toggle help |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if is_ctrl_c(key) {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Esc => Some(Message::Escape),

        KeyCode::Left => Some(Message::NavigateLeft),
        KeyCode::Right => Some(Message::NavigateRight),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),

        KeyCode::Enter => Some(Message::Activate),
        KeyCode::Char(' ') => Some(Message::PickUpOrDrop),
        KeyCode::Char('x') => Some(Message::ToggleStrike),
        KeyCode::Char('y') => Some(Message::Confirm),
        KeyCode::Char('n') => Some(Message::Cancel),
        KeyCode::Char('m') => Some(Message::ToggleTransferMode),
        KeyCode::Char('g') => Some(Message::ToggleGridMode),
        KeyCode::Char('t') => Some(Message::StampDate),
        KeyCode::Char('i') => Some(Message::Insert),
        KeyCode::Char('r') => Some(Message::Refresh),
        KeyCode::Char('?') => Some(Message::ToggleHelp),

        _ => None,
    }
}

/// Converts a key event to a message while a cell is being edited.
///
/// # Key Bindings (Edit Mode)
///
/// | Key | Action |
/// |-----|--------|
/// | `Enter` / `Esc` | Commit |
/// | `Alt+Enter` | Line break |
/// | Arrows | Commit and move |
/// | `Backspace` | Delete last character |
/// | Any char | Input |
#[must_use]
pub fn key_to_edit_message(key: KeyEvent) -> Option<Message> {
    if is_ctrl_c(key) {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => Some(Message::EditNewline),
        KeyCode::Enter => Some(Message::Activate),
        KeyCode::Esc => Some(Message::Escape),
        KeyCode::Left => Some(Message::NavigateLeft),
        KeyCode::Right => Some(Message::NavigateRight),
        KeyCode::Up => Some(Message::NavigateUp),
        KeyCode::Down => Some(Message::NavigateDown),
        KeyCode::Backspace => Some(Message::EditBackspace),
        KeyCode::Char(ch) => Some(Message::EditInput { ch }),
        _ => None,
    }
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

//! Widget components for the libcard TUI.
//!
//! This module provides rendering functions for the card screen, organized
//! into focused submodules for each visual component.
//!
//! # Overview
//!
//! The widget system follows a functional rendering approach where each widget
//! is a pure function that renders state to a buffer. This enables easy testing
//! and composition.
//!
//! # Modules
//!
//! - [`card`]: Renders the card grid and maps screen positions to slots
//! - [`dialog`]: Renders the move confirmation dialog
//! - [`status_bar`]: Renders the footer with notices and key hints
//! - [`help`]: Renders the keybinding overlay
//!
//! # Color Coding
//!
//! Cell text is colored by the status of the linked record
//! (see [`CellClass`](libcard_protocol::CellClass)):
//!
//! | Class | Color |
//! |-------|-------|
//! | `Plain` | White |
//! | `Highlight` | Yellow |
//! | `Dimmed` | Gray (`Color::DarkGray`) |
//! | `Alert` | Red (`Color::LightRed`) |

use ratatui::layout::Rect;

pub mod card;
pub mod dialog;
pub mod help;
pub mod status_bar;

// Re-export primary rendering functions for convenience
pub use card::{cell_at, render_card};
pub use dialog::{confirm_prompt, render_confirm_dialog};
pub use help::render_help_overlay;
pub use status_bar::{notice_color, render_status_bar};

/// Creates a centered rectangle within a given area.
///
/// If the requested dimensions exceed the available area, the rectangle
/// will be clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let popup_width = width.min(area.width);
    let popup_height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect::new(x, y, popup_width, popup_height)
}

#[cfg(test)]
mod tests;

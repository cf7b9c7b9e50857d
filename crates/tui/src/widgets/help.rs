//! Help overlay widget.
//!
//! This module provides the help overlay that displays all available keybindings
//! when the user presses `?`.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::centered_rect;

/// The width of the help overlay panel.
const HELP_WIDTH: u16 = 42;

/// Renders a centered help overlay displaying all keybindings.
///
/// The overlay is drawn on top of the card after clearing the area behind
/// it.
///
/// # Examples
///
/// ```
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
/// use libcard_tui::widgets::render_help_overlay;
///
/// let area = Rect::new(0, 0, 80, 30);
/// let mut buf = Buffer::empty(area);
///
/// render_help_overlay(area, &mut buf);
/// ```
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let lines = build_help_lines();
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup_area = centered_rect(HELP_WIDTH, height, area);

    Clear.render(popup_area, buf);

    let help_block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightYellow));

    Paragraph::new(lines)
        .block(help_block)
        .alignment(Alignment::Left)
        .render(popup_area, buf);
}

/// Builds the lines of help content.
fn build_help_lines() -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Green);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let binding = |key: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<11}"), key_style),
            Span::styled(action, text_style),
        ])
    };

    vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", header_style)),
        binding("← →", "Previous / next column"),
        binding("↑ ↓", "Previous / next slot"),
        Line::from(""),
        Line::from(Span::styled("  Cells", header_style)),
        binding("Enter", "Edit / finish editing"),
        binding("Alt+Enter", "Line break while editing"),
        binding("x", "Strike through"),
        binding("t", "Stamp today's date"),
        binding("i", "Insert"),
        Line::from(""),
        Line::from(Span::styled("  Transfers", header_style)),
        binding("Space", "Pick up / drop"),
        binding("Esc", "Cancel drag"),
        binding("y / n", "Confirm / cancel move"),
        binding("m", "Switch copy / move"),
        Line::from(""),
        Line::from(Span::styled("  Other", header_style)),
        binding("g", "Switch editor / viewer"),
        binding("r", "Reload the ledger"),
        binding("?", "Toggle help"),
        binding("Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", hint_style)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn render_help_overlay_creates_output() {
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);

        render_help_overlay(area, &mut buf);

        let content = buffer_to_string(&buf);
        assert!(content.contains("Help"));
        assert!(content.contains("Navigation"));
        assert!(content.contains("Transfers"));
        assert!(content.contains("Press any key to close"));
    }

    #[test]
    fn render_help_overlay_handles_small_area() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);

        render_help_overlay(area, &mut buf);
    }

    #[test]
    fn build_help_lines_contains_all_keybindings() {
        let content: String = build_help_lines()
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        for key in ["←", "↓", "Enter", "Space", "Esc", "y / n", "Ctrl+C", "?"] {
            assert!(content.contains(key), "missing {key}");
        }
    }
}

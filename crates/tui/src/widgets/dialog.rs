//! Move confirmation dialog.
//!
//! Shown while a linked move waits for the user's go-ahead, and kept up in a
//! "saving" state while the ledger write is in flight.

use libcard_protocol::PendingMove;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::centered_rect;

const DIALOG_WIDTH: u16 = 60;
const DIALOG_HEIGHT: u16 = 10;

/// The question the dialog asks.
///
/// # Examples
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use libcard_protocol::{PendingMove, Record, RecordType};
/// use libcard_tui::widgets::confirm_prompt;
///
/// # let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
/// let pending = PendingMove {
///     source_index: 12,
///     target_index: 15,
///     value: "BORROWED\n2024-05-01".to_string(),
///     record: Record::new(7, RecordType::Borrowed, at, Some(12)),
///     transaction: None,
/// };
/// assert_eq!(confirm_prompt(&pending), "Move cell 12 to cell 15?");
/// ```
#[must_use]
pub fn confirm_prompt(pending: &PendingMove) -> String {
    format!(
        "Move cell {} to cell {}?",
        pending.source_index, pending.target_index
    )
}

/// Renders the confirmation dialog centered in `area`.
///
/// With `saving` set the key hints are replaced by a progress line, since
/// further confirmations are ignored until the ledger answers.
pub fn render_confirm_dialog(pending: &PendingMove, saving: bool, area: Rect, buf: &mut Buffer) {
    let popup_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    Clear.render(popup_area, buf);

    let accent = if saving { Color::Cyan } else { Color::Yellow };
    let title = if saving { " Saving " } else { " Move Record " };

    let footer = if saving {
        Line::from(Span::styled(
            "Saving to the ledger...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green)),
            Span::styled(" Confirm   ", Style::default().fg(Color::White)),
            Span::styled("n", Style::default().fg(Color::Red)),
            Span::styled(" Cancel", Style::default().fg(Color::White)),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            confirm_prompt(pending),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            pending.details(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        footer,
    ];

    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup_area, buf);
}

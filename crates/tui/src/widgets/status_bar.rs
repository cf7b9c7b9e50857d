//! Status bar rendering widget.
//!
//! The footer shows the latest notice while it is fresh, and otherwise the
//! key hints for whatever the grid is doing. Its border title carries the
//! transfer mode, grid mode and transfer state.

use libcard_protocol::{CardGrid, Notice, NoticeKind, TransferState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Color used for a notice of the given kind.
///
/// # Examples
///
/// ```
/// use libcard_protocol::NoticeKind;
/// use libcard_tui::widgets::notice_color;
/// use ratatui::style::Color;
///
/// assert_eq!(notice_color(NoticeKind::Success), Color::Green);
/// assert_eq!(notice_color(NoticeKind::Failure), Color::Red);
/// ```
#[must_use]
pub const fn notice_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Failure => Color::Red,
        NoticeKind::Info => Color::Cyan,
    }
}

/// Renders the status bar.
///
/// # Layout
///
/// ```text
/// +---------------------------------------------- Move · Editor · idle -+
/// | ←→↑↓ Move  Enter Edit  Space Pick up  x Strike  ? Help              |
/// +---------------------------------------------------------------------+
/// ```
///
/// # Examples
///
/// ```
/// use libcard_protocol::{CardGrid, CardLayout, IndexHandle, Notice, TransactionIndex};
/// use libcard_tui::widgets::render_status_bar;
/// use ratatui::{buffer::Buffer, layout::Rect};
///
/// let grid = CardGrid::new(CardLayout::default(), IndexHandle::fixed(TransactionIndex::default()));
/// let notice = Notice::Copied { source: 12, target: 20 };
///
/// let area = Rect::new(0, 0, 80, 3);
/// let mut buf = Buffer::empty(area);
/// render_status_bar(&grid, Some(&notice), area, &mut buf);
/// ```
pub fn render_status_bar(grid: &CardGrid, notice: Option<&Notice>, area: Rect, buf: &mut Buffer) {
    let content = match notice {
        Some(notice) => notice_line(notice),
        None => hint_line(grid),
    };

    let modes = format!(
        " {} · {} · {} ",
        grid.transfer_mode().display_name(),
        grid.mode().display_name(),
        grid.transfer_state().label()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(Span::styled(modes, Style::default().fg(Color::Gray))).right_aligned());

    Paragraph::new(content).block(block).render(area, buf);
}

fn notice_line(notice: &Notice) -> Line<'static> {
    let color = notice_color(notice.kind());
    Line::from(vec![
        Span::styled(
            notice.title(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(": ", Style::default().fg(color)),
        Span::styled(notice.description(), Style::default().fg(Color::White)),
    ])
}

fn hint_line(grid: &CardGrid) -> Line<'static> {
    let hints: &[(&str, &str)] = if grid.editing_index().is_some() {
        &[("Enter/Esc", "Done"), ("Alt+Enter", "Line break"), ("Backspace", "Delete")]
    } else {
        match grid.transfer_state() {
            TransferState::Idle => &[
                ("←→↑↓", "Move"),
                ("Enter", "Edit"),
                ("Space", "Pick up"),
                ("x", "Strike"),
                ("?", "Help"),
            ],
            TransferState::Dragging { .. } => {
                &[("←→↑↓", "Choose target"), ("Space", "Drop"), ("Esc", "Cancel")]
            }
            TransferState::PendingConfirm(_) => &[("y", "Confirm move"), ("n", "Cancel")],
            TransferState::Persisting(_) => &[("", "Saving to the ledger...")],
        }
    };

    let key_style = Style::default().fg(Color::Yellow);
    let text_style = Style::default().fg(Color::White);
    let spans = hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(*key, key_style),
                Span::styled(format!(" {action}  "), text_style),
            ]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

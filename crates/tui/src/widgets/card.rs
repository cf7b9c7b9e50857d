//! Card grid rendering and hit testing.
//!
//! The card is drawn column by column in placing-number order. When every
//! row fits, each cell is a rounded box titled with its slot number;
//! otherwise each cell collapses to a single line.

use libcard_protocol::{CardGrid, CardLayout, CellClass, PlacingNumber};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::layout::CELL_HEIGHT;

/// Marker drawn after the text of the cell being edited.
pub const EDIT_CARET: char = '▏';

/// How a cell is framed, from the grid's editing and transfer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Nothing special.
    Normal,
    /// Under the keyboard cursor.
    Cursor,
    /// Being edited.
    Editing,
    /// The cell being dragged.
    DragSource,
    /// The cell a drag would drop onto.
    DropTarget,
    /// Source of a move awaiting confirmation or being saved.
    MoveSource,
    /// Target of a move awaiting confirmation or being saved.
    MoveTarget,
}

/// Decides how `n` is framed.
///
/// Editing wins over transfer roles, and transfer roles win over the cursor.
#[must_use]
pub fn cell_role(grid: &CardGrid, n: PlacingNumber, cursor: PlacingNumber) -> CellRole {
    let transfer = grid.transfer_state();
    if grid.editing_index() == Some(n) {
        return CellRole::Editing;
    }
    if let Some(pending) = transfer.pending() {
        if pending.source_index == n {
            return CellRole::MoveSource;
        }
        if pending.target_index == n {
            return CellRole::MoveTarget;
        }
    }
    if transfer.drag_source() == Some(n) {
        CellRole::DragSource
    } else if transfer.hover_target() == Some(n) {
        CellRole::DropTarget
    } else if n == cursor {
        CellRole::Cursor
    } else {
        CellRole::Normal
    }
}

/// Border color for a cell role.
#[must_use]
pub const fn role_color(role: CellRole) -> Color {
    match role {
        CellRole::Normal => Color::DarkGray,
        CellRole::Cursor => Color::Cyan,
        CellRole::Editing => Color::LightCyan,
        CellRole::DragSource => Color::Magenta,
        CellRole::DropTarget => Color::Green,
        CellRole::MoveSource => Color::Yellow,
        CellRole::MoveTarget => Color::LightGreen,
    }
}

/// Text color for a host cell class.
///
/// # Examples
///
/// ```
/// use libcard_protocol::CellClass;
/// use libcard_tui::widgets::card::class_color;
/// use ratatui::style::Color;
///
/// assert_eq!(class_color(CellClass::Highlight), Color::Yellow);
/// assert_eq!(class_color(CellClass::Dimmed), Color::DarkGray);
/// ```
#[must_use]
pub const fn class_color(class: CellClass) -> Color {
    match class {
        CellClass::Plain => Color::White,
        CellClass::Highlight => Color::Yellow,
        CellClass::Dimmed => Color::DarkGray,
        CellClass::Alert => Color::LightRed,
    }
}

/// Height of one cell row when the card is drawn into `area`.
#[must_use]
pub fn row_height(layout: &CardLayout, area: Rect) -> u16 {
    (area.height / layout.rows_per_column.max(1)).clamp(1, CELL_HEIGHT)
}

/// Width of one card column when drawn into `area`.
#[must_use]
pub fn column_width(layout: &CardLayout, area: Rect) -> u16 {
    area.width / layout.columns.max(1)
}

/// Screen rectangle of the cell at `column`, `row`, or `None` if it does not
/// fit in `area`.
#[must_use]
pub fn cell_rect(layout: &CardLayout, area: Rect, column: u16, row: u16) -> Option<Rect> {
    if column >= layout.columns || row >= layout.rows_per_column {
        return None;
    }
    let width = column_width(layout, area);
    let height = row_height(layout, area);
    let top = row.checked_mul(height)?;
    if width == 0 || top.saturating_add(height) > area.height {
        return None;
    }
    Some(Rect::new(
        area.x + column * width,
        area.y + top,
        width,
        height,
    ))
}

/// The placing number drawn at screen position `x`, `y`.
///
/// # Examples
///
/// ```
/// use libcard_protocol::CardLayout;
/// use libcard_tui::widgets::card::cell_at;
/// use ratatui::layout::Rect;
///
/// let area = Rect::new(0, 3, 80, 36);
/// let layout = CardLayout::default();
/// assert_eq!(cell_at(&layout, area, 1, 3), Some(1));
/// assert_eq!(cell_at(&layout, area, 25, 7), Some(11));
/// assert_eq!(cell_at(&layout, area, 25, 1), None);
/// ```
#[must_use]
pub fn cell_at(layout: &CardLayout, area: Rect, x: u16, y: u16) -> Option<PlacingNumber> {
    if x < area.x || y < area.y {
        return None;
    }
    let width = column_width(layout, area);
    if width == 0 {
        return None;
    }
    let column = (x - area.x) / width;
    let row = (y - area.y) / row_height(layout, area);
    let rect = cell_rect(layout, area, column, row)?;
    (x < rect.right() && y < rect.bottom()).then(|| layout.placing_at(column, row))
}

/// Renders every cell of `grid` that fits in `area`.
///
/// # Examples
///
/// ```
/// use libcard_protocol::dummy::dummy_transactions;
/// use libcard_protocol::{CardGrid, CardLayout, IndexHandle, TransactionIndex};
/// use libcard_tui::widgets::render_card;
/// use ratatui::{buffer::Buffer, layout::Rect};
///
/// let index = IndexHandle::fixed(TransactionIndex::new(dummy_transactions()));
/// let mut grid = CardGrid::new(CardLayout::default(), index);
/// grid.populate_from_index();
///
/// let area = Rect::new(0, 0, 80, 36);
/// let mut buf = Buffer::empty(area);
/// render_card(&grid, 1, area, &mut buf);
/// ```
pub fn render_card(grid: &CardGrid, cursor: PlacingNumber, area: Rect, buf: &mut Buffer) {
    let layout = *grid.layout();
    for column in 0..layout.columns {
        for row in 0..layout.rows_per_column {
            if let Some(rect) = cell_rect(&layout, area, column, row) {
                let n = layout.placing_at(column, row);
                render_cell(grid, n, cell_role(grid, n, cursor), rect, buf);
            }
        }
    }
}

fn cell_lines(grid: &CardGrid, n: PlacingNumber) -> Vec<String> {
    match grid.edit_buffer() {
        Some(buffer) if grid.editing_index() == Some(n) => {
            let mut lines: Vec<String> = buffer.split('\n').map(str::to_string).collect();
            if let Some(last) = lines.last_mut() {
                last.push(EDIT_CARET);
            }
            lines
        }
        _ => grid
            .display_text(n)
            .lines()
            .map(str::to_string)
            .collect(),
    }
}

fn render_cell(grid: &CardGrid, n: PlacingNumber, role: CellRole, area: Rect, buf: &mut Buffer) {
    let mut text_style = Style::default().fg(class_color(grid.cell_class(n)));
    if grid.cell(n).is_struck_through {
        text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
    }
    let mut frame_style = Style::default().fg(role_color(role));
    if role != CellRole::Normal {
        frame_style = frame_style.add_modifier(Modifier::BOLD);
    }

    let mut lines = cell_lines(grid, n);

    if area.height >= 3 && area.width >= 4 {
        // Keep the tail in view while editing long text.
        let room = usize::from(area.height - 2);
        if lines.len() > room {
            lines.drain(..lines.len() - room);
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(frame_style)
            .title(Span::styled(format!(" {n} "), frame_style));
        let text: Vec<Line> = lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, text_style)))
            .collect();
        Paragraph::new(text).block(block).render(area, buf);
    } else {
        let label_style = if role == CellRole::Normal {
            frame_style
        } else {
            frame_style.add_modifier(Modifier::REVERSED)
        };
        let line = Line::from(vec![
            Span::styled(format!("{n:>3}"), label_style),
            Span::raw(" "),
            Span::styled(lines.join(" "), text_style),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

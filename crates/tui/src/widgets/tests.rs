//! Rendering tests across widgets.
//!
//! These compose the widgets the way the application does and check what
//! ends up on screen.

use libcard_protocol::{Notice, TransferMode};
use ratatui::{buffer::Buffer, layout::Rect};

use super::{
    centered_rect, render_card, render_confirm_dialog, render_help_overlay, render_status_bar,
};
use crate::layout::screen_areas;
use crate::test_utils::{buffer_to_string, demo_grid};

#[test]
fn centered_rect_positions_correctly() {
    let area = Rect::new(0, 0, 80, 24);
    let centered = centered_rect(20, 10, area);

    assert_eq!(centered.x, 30);
    assert_eq!(centered.y, 7);
    assert_eq!(centered.width, 20);
    assert_eq!(centered.height, 10);
}

#[test]
fn centered_rect_clamps_to_area() {
    let area = Rect::new(0, 0, 40, 12);
    let centered = centered_rect(100, 50, area);

    assert_eq!(centered.width, 40);
    assert_eq!(centered.height, 12);
    assert_eq!(centered.x, 0);
    assert_eq!(centered.y, 0);
}

#[test]
fn copy_result_and_notice_render_together() {
    let mut grid = demo_grid(TransferMode::Copy);
    grid.start_drag(12).unwrap();
    let notice = grid.drop_on(20).notice();

    let screen = Rect::new(0, 0, 80, 42);
    let areas = screen_areas(screen, true);
    let mut buf = Buffer::empty(screen);
    render_card(&grid, 20, areas.card, &mut buf);
    render_status_bar(&grid, notice.as_ref(), areas.status, &mut buf);

    let content = buffer_to_string(&buf);
    assert_eq!(content.matches("2024-04-16").count(), 2);
    assert!(content.contains("Content Copied: Copied from cell 12 to cell 20"));
}

#[test]
fn pending_move_leaves_cells_untouched_under_dialog() {
    let mut grid = demo_grid(TransferMode::Move);
    grid.start_drag(10).unwrap();
    grid.drop_on(13);
    let pending = grid.transfer_state().pending().cloned();

    let screen = Rect::new(0, 0, 80, 39);
    let areas = screen_areas(screen, false);
    let mut buf = Buffer::empty(screen);
    render_card(&grid, 13, areas.card, &mut buf);
    render_status_bar(&grid, None, areas.status, &mut buf);
    if let Some(pending) = pending.as_ref() {
        render_confirm_dialog(pending, false, screen, &mut buf);
    }

    let content = buffer_to_string(&buf);
    assert!(pending.is_some());
    assert!(content.contains("Move cell 10 to cell 13?"));
    assert!(content.contains("awaiting confirmation"));
    assert_eq!(grid.value(13), "");
}

#[test]
fn help_overlay_covers_the_card() {
    let grid = demo_grid(TransferMode::Move);
    let screen = Rect::new(0, 0, 80, 39);
    let mut buf = Buffer::empty(screen);
    render_card(&grid, 1, screen, &mut buf);
    render_help_overlay(screen, &mut buf);

    let content = buffer_to_string(&buf);
    assert!(content.contains("Help"));
    assert!(content.contains("Pick up / drop"));
}

#[test]
fn refreshed_notice_is_informational() {
    let grid = demo_grid(TransferMode::Move);
    let area = Rect::new(0, 0, 80, 3);
    let mut buf = Buffer::empty(area);
    render_status_bar(&grid, Some(&Notice::Refreshed { transactions: 4 }), area, &mut buf);

    assert!(buffer_to_string(&buf).contains("Ledger Refreshed: Loaded 4 transactions"));
}

//! Test utilities for the TUI crate.
//!
//! Shared fixtures and buffer helpers used across test modules.

use libcard_protocol::dummy::dummy_transactions;
use libcard_protocol::{CardGrid, CardLayout, IndexHandle, TransactionIndex, TransferMode};
use ratatui::buffer::Buffer;

use crate::host::LedgerHost;

/// Converts a ratatui [`Buffer`] to a string representation.
///
/// Each row of the buffer becomes a line in the output string. Trailing
/// whitespace is trimmed from each line to produce cleaner output suitable
/// for snapshot testing.
#[must_use]
pub(crate) fn buffer_to_string(buf: &Buffer) -> String {
    let mut result = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            if let Some(cell) = buf.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        let trimmed = result.trim_end_matches(' ');
        result.truncate(trimmed.len());
        result.push('\n');
    }
    result
}

/// A default-layout grid loaded with the demo ledger.
#[must_use]
pub(crate) fn demo_grid(mode: TransferMode) -> CardGrid {
    let index = IndexHandle::fixed(TransactionIndex::new(dummy_transactions()));
    let mut grid = CardGrid::new(CardLayout::default(), index.clone())
        .with_transfer_mode(mode)
        .with_host(LedgerHost::new(index));
    grid.populate_from_index();
    grid
}

//! The terminal's [`CardHost`].
//!
//! Cells are classified by the status of the record linked to their slot,
//! and the grid's callbacks are traced so a session can be followed in the
//! log file.

use chrono::NaiveDate;
use libcard_protocol::{CardHost, CellClass, IndexHandle, PlacingNumber, RecordType};
use tracing::{debug, info};

/// Styling class for a linked record's status.
///
/// # Examples
///
/// ```
/// use libcard_protocol::{CellClass, RecordType};
/// use libcard_tui::host::class_for;
///
/// assert_eq!(class_for(RecordType::Borrowed), CellClass::Highlight);
/// assert_eq!(class_for(RecordType::Returned), CellClass::Dimmed);
/// assert_eq!(class_for(RecordType::Subtraction), CellClass::Alert);
/// ```
#[must_use]
pub const fn class_for(record_type: RecordType) -> CellClass {
    match record_type {
        RecordType::Borrowed | RecordType::Extended => CellClass::Highlight,
        RecordType::Returned | RecordType::Cleared => CellClass::Dimmed,
        RecordType::Subtraction => CellClass::Alert,
        RecordType::Addition => CellClass::Plain,
    }
}

/// Host installed on the terminal's grid.
#[derive(Debug, Clone)]
pub struct LedgerHost {
    index: IndexHandle,
}

impl LedgerHost {
    /// Creates a host that classifies cells from `index`.
    #[must_use]
    pub fn new(index: IndexHandle) -> Self {
        Self { index }
    }
}

impl CardHost for LedgerHost {
    fn on_data_change(&mut self, index: PlacingNumber, text: &str) {
        debug!(index, chars = text.chars().count(), "cell changed");
    }

    fn on_line_through_toggle(&mut self, index: PlacingNumber) {
        debug!(index, "strike toggled");
    }

    fn on_date_select(&mut self, index: PlacingNumber, date: NaiveDate) {
        debug!(index, %date, "date stamped");
    }

    fn on_insert_click(&mut self, index: PlacingNumber) {
        info!(index, "insert requested");
    }

    fn cell_class(&self, index: PlacingNumber) -> CellClass {
        self.index
            .snapshot()
            .find(index)
            .map_or(CellClass::Plain, |linked| class_for(linked.record.record_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcard_protocol::TransactionIndex;
    use libcard_protocol::dummy::dummy_transactions;

    #[test]
    fn classes_follow_linked_records() {
        let host = LedgerHost::new(IndexHandle::fixed(TransactionIndex::new(dummy_transactions())));

        assert_eq!(host.cell_class(1), CellClass::Highlight);
        assert_eq!(host.cell_class(2), CellClass::Highlight);
        assert_eq!(host.cell_class(3), CellClass::Dimmed);
        assert_eq!(host.cell_class(12), CellClass::Alert);
        assert_eq!(host.cell_class(6), CellClass::Plain);
    }

    #[test]
    fn only_additions_stay_plain() {
        let plain: Vec<_> = RecordType::all()
            .into_iter()
            .filter(|kind| class_for(*kind) == CellClass::Plain)
            .collect();
        assert_eq!(plain, vec![RecordType::Addition]);
        assert_eq!(class_for(RecordType::Cleared), CellClass::Dimmed);
        assert_eq!(class_for(RecordType::Addition), CellClass::Plain);
    }
}

//! The card grid controller.
//!
//! [`CardGrid`] owns every cell of one card and is the only thing that
//! mutates them. It enforces the editing rules (one cell editable at a time,
//! blur commits), decides which cells may be dragged, and drives the
//! [`TransferState`] machine. The transaction index is injected at
//! construction as an [`IndexHandle`]; a grid cannot exist without one.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, DISPLAY_WIDTH, render_value};
use crate::error::{ProtocolError, Result};
use crate::index::IndexHandle;
use crate::notice::Notice;
use crate::payload::DragPayload;
use crate::record::{PlacingNumber, Record};
use crate::transfer::{DropOutcome, MoveRequest, PendingMove, TransferMode, TransferState};

static EMPTY_CELL: Cell = Cell {
    value: String::new(),
    is_struck_through: false,
};

/// Shape of a card: how many columns, how many rows each, and the placing
/// number of the top-left cell.
///
/// # Examples
///
/// ```
/// use libcard_protocol::CardLayout;
///
/// let layout = CardLayout::new(2, 9, 1);
/// assert_eq!(layout.placing_at(0, 0), 1);
/// assert_eq!(layout.placing_at(1, 0), 10);
/// assert_eq!(layout.position_of(12), Some((1, 2)));
/// assert_eq!(layout.capacity(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardLayout {
    /// Number of columns on the card.
    pub columns: u16,
    /// Number of cells in each column.
    pub rows_per_column: u16,
    /// Placing number of the first cell.
    pub start_number: PlacingNumber,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self::new(4, 9, 1)
    }
}

impl CardLayout {
    /// Creates a layout.
    #[must_use]
    pub const fn new(columns: u16, rows_per_column: u16, start_number: PlacingNumber) -> Self {
        Self {
            columns,
            rows_per_column,
            start_number,
        }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.columns as usize * self.rows_per_column as usize
    }

    /// Placing number shown at `column`, `row` (both 0-based), never below 1.
    #[must_use]
    pub fn placing_at(&self, column: u16, row: u16) -> PlacingNumber {
        let offset = u32::from(column) * u32::from(self.rows_per_column) + u32::from(row);
        self.start_number.saturating_add(offset).max(1)
    }

    /// Column and row of placing number `n`, if it is on this card.
    #[must_use]
    pub fn position_of(&self, n: PlacingNumber) -> Option<(u16, u16)> {
        if self.rows_per_column == 0 || n < self.start_number.max(1) {
            return None;
        }
        let offset = n - self.start_number;
        let rows = u32::from(self.rows_per_column);
        let column = u16::try_from(offset / rows).ok()?;
        let row = u16::try_from(offset % rows).ok()?;
        (column < self.columns).then_some((column, row))
    }

    /// Returns `true` if `n` is on this card.
    #[must_use]
    pub fn contains(&self, n: PlacingNumber) -> bool {
        self.position_of(n).is_some()
    }

    /// Placing numbers in column-major order.
    pub fn numbers(&self) -> impl Iterator<Item = PlacingNumber> + '_ {
        (0..self.columns)
            .flat_map(move |column| (0..self.rows_per_column).map(move |row| (column, row)))
            .map(|(column, row)| self.placing_at(column, row))
    }
}

/// Whether the card is being edited or just viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    /// Full editing, including date stamping.
    #[default]
    Editor,
    /// Editing without the date stamp affordance.
    Viewer,
}

impl GridMode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Editor => Self::Viewer,
            Self::Viewer => Self::Editor,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }
}

/// Visual class a host assigns to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellClass {
    /// No special styling.
    #[default]
    Plain,
    /// Draw attention (an open loan).
    Highlight,
    /// De-emphasize (a closed loan).
    Dimmed,
    /// Warn (a correction line).
    Alert,
}

/// Callbacks the surrounding editor receives from a grid.
///
/// Every method has a no-op default so hosts implement only what they need.
pub trait CardHost {
    /// A cell's text changed.
    fn on_data_change(&mut self, _index: PlacingNumber, _text: &str) {}

    /// A cell's struck-through flag flipped.
    fn on_line_through_toggle(&mut self, _index: PlacingNumber) {}

    /// A date was stamped into a cell.
    fn on_date_select(&mut self, _index: PlacingNumber, _date: NaiveDate) {}

    /// The insert affordance of an empty cell was used.
    fn on_insert_click(&mut self, _index: PlacingNumber) {}

    /// Styling class for a cell.
    fn cell_class(&self, _index: PlacingNumber) -> CellClass {
        CellClass::Plain
    }
}

/// A host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl CardHost for NoopHost {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditSession {
    index: PlacingNumber,
    buffer: String,
}

/// Cells of one card plus the editing and transfer state around them.
///
/// # Examples
///
/// ```
/// use libcard_protocol::{CardGrid, CardLayout, TransferMode, index::{IndexHandle, TransactionIndex}};
///
/// let index = IndexHandle::fixed(TransactionIndex::default());
/// let mut grid = CardGrid::new(CardLayout::default(), index).with_transfer_mode(TransferMode::Copy);
///
/// grid.set_value(3, "margin note");
/// grid.start_drag(3).unwrap();
/// let outcome = grid.drop_on(4);
///
/// assert!(outcome.mutated());
/// assert_eq!(grid.value(4), "margin note");
/// assert_eq!(grid.value(3), "margin note");
/// ```
pub struct CardGrid {
    layout: CardLayout,
    cells: BTreeMap<PlacingNumber, Cell>,
    index: IndexHandle,
    transfer_mode: TransferMode,
    mode: GridMode,
    display_width: usize,
    editing: Option<EditSession>,
    transfer: TransferState,
    host: Box<dyn CardHost>,
}

impl fmt::Debug for CardGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardGrid")
            .field("layout", &self.layout)
            .field("cells", &self.cells)
            .field("transfer_mode", &self.transfer_mode)
            .field("mode", &self.mode)
            .field("editing", &self.editing)
            .field("transfer", &self.transfer)
            .finish_non_exhaustive()
    }
}

impl CardGrid {
    /// Creates an empty grid reading record links from `index`.
    #[must_use]
    pub fn new(layout: CardLayout, index: IndexHandle) -> Self {
        Self {
            layout,
            cells: BTreeMap::new(),
            index,
            transfer_mode: TransferMode::default(),
            mode: GridMode::default(),
            display_width: DISPLAY_WIDTH,
            editing: None,
            transfer: TransferState::Idle,
            host: Box::new(NoopHost),
        }
    }

    /// Sets the transfer mode.
    #[must_use]
    pub fn with_transfer_mode(mut self, mode: TransferMode) -> Self {
        self.transfer_mode = mode;
        self
    }

    /// Sets the grid mode.
    #[must_use]
    pub fn with_mode(mut self, mode: GridMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets how many characters a cell shows before truncating.
    #[must_use]
    pub fn with_display_width(mut self, width: usize) -> Self {
        self.display_width = width;
        self
    }

    /// Installs the host that receives callbacks.
    #[must_use]
    pub fn with_host(mut self, host: impl CardHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// The card layout.
    #[must_use]
    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// The current transfer mode.
    #[must_use]
    pub fn transfer_mode(&self) -> TransferMode {
        self.transfer_mode
    }

    /// Switches the transfer mode. Ignored while a transfer is in flight.
    pub fn set_transfer_mode(&mut self, mode: TransferMode) -> bool {
        if !self.transfer.is_idle() {
            return false;
        }
        self.transfer_mode = mode;
        true
    }

    /// The grid mode.
    #[must_use]
    pub fn mode(&self) -> GridMode {
        self.mode
    }

    /// Switches between editor and viewer mode.
    pub fn set_mode(&mut self, mode: GridMode) {
        self.mode = mode;
    }

    /// The drag/move lifecycle state.
    #[must_use]
    pub fn transfer_state(&self) -> &TransferState {
        &self.transfer
    }

    /// The index handle this grid reads.
    #[must_use]
    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    /// Returns the cell at `index`; unseen cells are empty.
    #[must_use]
    pub fn cell(&self, index: PlacingNumber) -> &Cell {
        self.cells.get(&index.max(1)).unwrap_or(&EMPTY_CELL)
    }

    /// Returns the text of the cell at `index`.
    #[must_use]
    pub fn value(&self, index: PlacingNumber) -> &str {
        &self.cell(index).value
    }

    /// Returns what the cell at `index` displays.
    #[must_use]
    pub fn display_text(&self, index: PlacingNumber) -> String {
        render_value(self.value(index), self.display_width)
    }

    /// Styling class the host assigns to `index`.
    #[must_use]
    pub fn cell_class(&self, index: PlacingNumber) -> CellClass {
        self.host.cell_class(index.max(1))
    }

    fn cell_mut(&mut self, index: PlacingNumber) -> &mut Cell {
        self.cells.entry(index.max(1)).or_default()
    }

    /// Overwrites a cell's text. The strike flag is kept.
    pub fn set_value(&mut self, index: PlacingNumber, text: impl Into<String>) {
        let index = index.max(1);
        let text = text.into();
        self.host.on_data_change(index, &text);
        self.cell_mut(index).value = text;
    }

    /// Flips a cell's strike flag. The text is kept.
    pub fn toggle_strike(&mut self, index: PlacingNumber) {
        let index = index.max(1);
        self.cell_mut(index).toggle_strike();
        self.host.on_line_through_toggle(index);
    }

    /// Fills cells from every placed record in the index.
    ///
    /// Returns how many cells were written. Cells without a record, and the
    /// cell being edited, are left as they are.
    pub fn populate_from_index(&mut self) -> usize {
        let snapshot = self.index.snapshot();
        let mut written = 0;
        for (n, linked) in snapshot.placed() {
            if self.layout.contains(n) && self.editing_index() != Some(n) {
                self.cell_mut(n).value = linked.record.cell_text();
                written += 1;
            }
        }
        written
    }

    // --- Editing ---

    /// The click gesture: enters edit mode on `index`.
    ///
    /// # Errors
    ///
    /// See [`begin_edit`](Self::begin_edit).
    pub fn click(&mut self, index: PlacingNumber) -> Result<()> {
        self.begin_edit(index)
    }

    /// The double-click gesture: toggles the strike flag on `index`.
    pub fn double_click(&mut self, index: PlacingNumber) {
        self.toggle_strike(index);
    }

    /// Makes `index` the one editable cell, committing any other cell that
    /// was being edited.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TransferInProgress`] while a drag,
    /// confirmation, or ledger write is under way.
    pub fn begin_edit(&mut self, index: PlacingNumber) -> Result<()> {
        if !self.transfer.is_idle() {
            return Err(ProtocolError::TransferInProgress);
        }
        let index = index.max(1);
        if self.editing_index() == Some(index) {
            return Ok(());
        }
        self.commit_edit();
        self.editing = Some(EditSession {
            index,
            buffer: self.value(index).to_string(),
        });
        Ok(())
    }

    /// The cell being edited, if any.
    #[must_use]
    pub fn editing_index(&self) -> Option<PlacingNumber> {
        self.editing.as_ref().map(|session| session.index)
    }

    /// The in-progress text of the edited cell.
    #[must_use]
    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|session| session.buffer.as_str())
    }

    /// Replaces the in-progress text.
    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.buffer = text.into();
        }
    }

    /// Appends a character to the in-progress text.
    pub fn edit_input(&mut self, ch: char) {
        if let Some(session) = self.editing.as_mut() {
            session.buffer.push(ch);
        }
    }

    /// Removes the last character of the in-progress text.
    pub fn edit_backspace(&mut self) {
        if let Some(session) = self.editing.as_mut() {
            session.buffer.pop();
        }
    }

    /// The blur gesture: leaves edit mode, writing the text as-is (empty
    /// included). Returns the committed cell.
    pub fn commit_edit(&mut self) -> Option<PlacingNumber> {
        let session = self.editing.take()?;
        self.set_value(session.index, session.buffer);
        Some(session.index)
    }

    // --- Affordances on empty cells ---

    /// Returns `true` if `index` has text and is not being edited.
    #[must_use]
    pub fn is_draggable(&self, index: PlacingNumber) -> bool {
        let index = index.max(1);
        !self.cell(index).is_blank() && self.editing_index() != Some(index)
    }

    /// Stamps `date` into a non-draggable cell. Editor mode only.
    ///
    /// Stamping the cell being edited discards its edit buffer; the date
    /// replaces the in-progress text.
    ///
    /// Returns `false` when the affordance is not offered for `index`.
    pub fn select_date(&mut self, index: PlacingNumber, date: NaiveDate) -> bool {
        let index = index.max(1);
        if self.mode != GridMode::Editor || self.is_draggable(index) || !self.transfer.is_idle() {
            return false;
        }
        if self.editing_index() == Some(index) {
            self.editing = None;
        }
        self.host.on_date_select(index, date);
        self.set_value(index, date.format("%Y-%m-%d").to_string());
        true
    }

    /// Forwards the insert affordance of a non-draggable cell to the host.
    pub fn insert_click(&mut self, index: PlacingNumber) -> bool {
        let index = index.max(1);
        if self.is_draggable(index) {
            return false;
        }
        self.host.on_insert_click(index);
        true
    }

    // --- Drag transfer ---

    /// Starts dragging `index`, attaching its linked record if any.
    ///
    /// Any cell being edited elsewhere is committed first, as a blur would.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TransferInProgress`] if a transfer is under
    /// way and [`ProtocolError::NotDraggable`] if the cell is empty or being
    /// edited.
    pub fn start_drag(&mut self, index: PlacingNumber) -> Result<DragPayload> {
        let index = index.max(1);
        if !self.transfer.is_idle() {
            return Err(ProtocolError::TransferInProgress);
        }
        if !self.is_draggable(index) {
            return Err(ProtocolError::NotDraggable(index));
        }
        self.commit_edit();

        let snapshot = self.index.snapshot();
        let payload = DragPayload::new(index, self.value(index), snapshot.find(index));
        self.transfer = TransferState::Dragging {
            payload: payload.clone(),
            hover: None,
        };
        Ok(payload)
    }

    /// Marks `index` as the hovered drop target. No cell changes.
    pub fn hover(&mut self, index: PlacingNumber) -> bool {
        match &mut self.transfer {
            TransferState::Dragging { hover, .. } => {
                *hover = Some(index.max(1));
                true
            }
            _ => false,
        }
    }

    /// Clears the hovered drop target.
    pub fn leave_hover(&mut self) {
        if let TransferState::Dragging { hover, .. } = &mut self.transfer {
            *hover = None;
        }
    }

    /// Ends a drag without dropping.
    pub fn cancel_drag(&mut self) -> bool {
        if matches!(self.transfer, TransferState::Dragging { .. }) {
            self.transfer = TransferState::Idle;
            true
        } else {
            false
        }
    }

    /// Drops the current drag onto `target`.
    pub fn drop_on(&mut self, target: PlacingNumber) -> DropOutcome {
        match std::mem::take(&mut self.transfer) {
            TransferState::Dragging { payload, .. } => self.apply_drop(payload, target),
            other => {
                self.transfer = other;
                DropOutcome::NoDrag
            }
        }
    }

    /// Drops encoded transfer data onto `target`.
    ///
    /// The data is validated first; unusable data ends any drag and is
    /// reported as [`DropOutcome::Rejected`] without touching a cell. Any
    /// edit in progress is committed before the drop.
    ///
    /// Data from another grid is accepted, so cards can exchange content,
    /// but it is always copied: a payload only moves when its source cell
    /// on this grid still holds the same text and the same linked record.
    pub fn drop_transfer_data(&mut self, target: PlacingNumber, data: &str) -> DropOutcome {
        if matches!(
            self.transfer,
            TransferState::PendingConfirm(_) | TransferState::Persisting(_)
        ) {
            return DropOutcome::Rejected(ProtocolError::TransferInProgress);
        }
        self.cancel_drag();
        let payload = match DragPayload::from_transfer_data(data) {
            Ok(payload) => payload,
            Err(err) => return DropOutcome::Rejected(err),
        };
        self.commit_edit();

        if self.is_local(&payload) {
            return self.apply_drop(payload, target);
        }
        let target = target.max(1);
        let source = payload.source_index;
        self.set_value(target, payload.value);
        DropOutcome::Copied { source, target }
    }

    /// Whether `payload` describes a cell of this grid as it stands now.
    fn is_local(&self, payload: &DragPayload) -> bool {
        let source = payload.source_index.max(1);
        if self.value(source) != payload.value {
            return false;
        }
        let snapshot = self.index.snapshot();
        let linked = snapshot.find(source).map(|linked| linked.record.id);
        linked == payload.record.as_ref().map(|record| record.id)
    }

    fn apply_drop(&mut self, payload: DragPayload, target: PlacingNumber) -> DropOutcome {
        let target = target.max(1);
        let source = payload.source_index;
        if target == source {
            return DropOutcome::SameCell;
        }

        match (self.transfer_mode, payload.record) {
            (TransferMode::Copy, _) => {
                self.set_value(target, payload.value);
                DropOutcome::Copied { source, target }
            }
            (TransferMode::Move, Some(record)) => {
                let pending = PendingMove {
                    source_index: source,
                    target_index: target,
                    value: payload.value,
                    record,
                    transaction: payload.transaction,
                };
                self.transfer = TransferState::PendingConfirm(pending.clone());
                DropOutcome::AwaitingConfirmation(pending)
            }
            (TransferMode::Move, None) => {
                self.set_value(target, payload.value);
                self.set_value(source, "");
                DropOutcome::Relocated { source, target }
            }
        }
    }

    /// Confirms the pending move and hands back the ledger write to issue.
    ///
    /// No cell changes until [`settle_move`](Self::settle_move) receives a
    /// successful acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NoPendingMove`] if nothing awaits
    /// confirmation.
    pub fn confirm_move(&mut self) -> Result<MoveRequest> {
        match std::mem::take(&mut self.transfer) {
            TransferState::PendingConfirm(pending) => {
                let request = pending.request();
                self.transfer = TransferState::Persisting(pending);
                Ok(request)
            }
            other => {
                self.transfer = other;
                Err(ProtocolError::NoPendingMove)
            }
        }
    }

    /// Dismisses the pending move without touching any cell.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::TransferInProgress`] once the write has been
    /// issued, and [`ProtocolError::NoPendingMove`] if nothing is pending.
    pub fn cancel_move(&mut self) -> Result<Notice> {
        match std::mem::take(&mut self.transfer) {
            TransferState::PendingConfirm(pending) => Ok(Notice::MoveCancelled {
                source: pending.source_index,
                target: pending.target_index,
            }),
            other => {
                let err = if other.is_persisting() {
                    ProtocolError::TransferInProgress
                } else {
                    ProtocolError::NoPendingMove
                };
                self.transfer = other;
                Err(err)
            }
        }
    }

    /// Applies the ledger's answer to the move being persisted.
    ///
    /// On success the target takes the dragged text and the source is
    /// cleared. On failure no cell changes. Either way the grid returns to
    /// idle.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotPersisting`] if no write is outstanding.
    pub fn settle_move<E: fmt::Display>(
        &mut self,
        ack: std::result::Result<Record, E>,
    ) -> Result<Notice> {
        let pending = match std::mem::take(&mut self.transfer) {
            TransferState::Persisting(pending) => pending,
            other => {
                self.transfer = other;
                return Err(ProtocolError::NotPersisting);
            }
        };

        match ack {
            Ok(record) => {
                let details = pending.details();
                self.set_value(pending.target_index, pending.value);
                self.set_value(pending.source_index, "");
                Ok(Notice::Moved {
                    record_id: record.id,
                    source: pending.source_index,
                    target: pending.target_index,
                    details,
                })
            }
            Err(err) => Ok(Notice::MoveFailed {
                reason: err.to_string(),
            }),
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::index::TransactionIndex;
    use proptest::prelude::*;

    fn grid(mode: TransferMode) -> CardGrid {
        CardGrid::new(CardLayout::default(), IndexHandle::fixed(TransactionIndex::default()))
            .with_transfer_mode(mode)
    }

    proptest! {
        /// Whitespace-only cells can never be dragged.
        #[test]
        fn blank_cells_never_drag(n in 1u32..=36, blank in "[ \t\n]{0,5}") {
            let mut grid = grid(TransferMode::Copy);
            grid.set_value(n, blank);
            prop_assert!(!grid.is_draggable(n));
            prop_assert!(grid.start_drag(n).is_err());
        }

        /// Dropping a drag onto its own source never changes any cell.
        #[test]
        fn same_cell_drop_never_mutates(
            n in 1u32..=36,
            value in "[a-zA-Z0-9]{1,20}",
            copy in any::<bool>(),
        ) {
            let mode = if copy { TransferMode::Copy } else { TransferMode::Move };
            let mut grid = grid(mode);
            grid.set_value(n, value.clone());
            let before: Vec<String> = grid.layout().numbers().map(|i| grid.value(i).to_string()).collect();

            grid.start_drag(n).expect("drag");
            let outcome = grid.drop_on(n);

            let after: Vec<String> = grid.layout().numbers().map(|i| grid.value(i).to_string()).collect();
            prop_assert!(matches!(outcome, DropOutcome::SameCell));
            prop_assert_eq!(before, after);
        }
    }
}

//! Drag-transfer lifecycle.
//!
//! A transfer is one explicit state at a time:
//!
//! ```text
//! Idle ─drag─▶ Dragging ─drop(copy)──────────────────────────▶ Idle
//!                 │      drop(move, unlinked) ───────────────▶ Idle
//!                 │      drop(move, linked) ─▶ PendingConfirm ─cancel─▶ Idle
//!                 │                                  │
//!                 └─cancel─▶ Idle                 confirm
//!                                                    ▼
//!                                              Persisting ─ack/fail─▶ Idle
//! ```
//!
//! The transitions themselves are driven by [`CardGrid`](crate::CardGrid);
//! this module holds the state values and the drop outcome.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::index::describe_linked;
use crate::notice::Notice;
use crate::payload::DragPayload;
use crate::record::{PlacingNumber, Record, RecordId, Transaction};

/// Whether a drop duplicates content or relocates the authoritative record.
///
/// # Examples
///
/// ```
/// use libcard_protocol::TransferMode;
///
/// assert_eq!(TransferMode::default(), TransferMode::Move);
/// assert_eq!(TransferMode::Copy.toggled(), TransferMode::Move);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Write the dragged text into the target; the source is untouched and
    /// the ledger is never contacted.
    Copy,
    /// Move the record to the target slot after confirmation and a
    /// successful ledger update.
    #[default]
    Move,
}

impl TransferMode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Copy => Self::Move,
            Self::Move => Self::Copy,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Copy => "Copy",
            Self::Move => "Move",
        }
    }
}

impl std::str::FromStr for TransferMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Ok(Self::Copy),
            "move" => Ok(Self::Move),
            other => Err(format!("unknown transfer mode: {other}")),
        }
    }
}

/// A linked drop waiting for the user's go-ahead, or being written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    /// Slot the record occupies now.
    pub source_index: PlacingNumber,
    /// Slot the record is being moved to.
    pub target_index: PlacingNumber,
    /// Text carried by the drag.
    pub value: String,
    /// The record whose placing number will change.
    pub record: Record,
    /// Its transaction, when known.
    pub transaction: Option<Transaction>,
}

impl PendingMove {
    /// Book and record metadata for the confirmation prompt.
    #[must_use]
    pub fn details(&self) -> String {
        describe_linked(self.transaction.as_ref(), &self.record)
    }

    /// The ledger write this move requires.
    #[must_use]
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            record_id: self.record.id,
            source_index: self.source_index,
            target_index: self.target_index,
        }
    }
}

/// A placing-number update handed to the reconciliation writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    /// Record to update.
    pub record_id: RecordId,
    /// Slot it is leaving.
    pub source_index: PlacingNumber,
    /// Slot it is moving to.
    pub target_index: PlacingNumber,
}

/// The drag/move lifecycle of one grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransferState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A cell is being dragged.
    Dragging {
        /// What is being dragged.
        payload: DragPayload,
        /// Cell currently under the pointer, if any.
        hover: Option<PlacingNumber>,
    },
    /// A linked drop is waiting for confirmation. No cell has changed.
    PendingConfirm(PendingMove),
    /// A confirmed move is being written to the ledger. No cell has changed.
    Persisting(PendingMove),
}

impl TransferState {
    /// Returns `true` when nothing is in flight.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns the slot being dragged, if a drag is under way.
    #[must_use]
    pub fn drag_source(&self) -> Option<PlacingNumber> {
        match self {
            Self::Dragging { payload, .. } => Some(payload.source_index),
            _ => None,
        }
    }

    /// Returns the hovered drop target, if a drag is under way.
    #[must_use]
    pub fn hover_target(&self) -> Option<PlacingNumber> {
        match self {
            Self::Dragging { hover, .. } => *hover,
            _ => None,
        }
    }

    /// Returns the move awaiting confirmation or being persisted.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingMove> {
        match self {
            Self::PendingConfirm(pending) | Self::Persisting(pending) => Some(pending),
            _ => None,
        }
    }

    /// Returns `true` while a confirmed move is being written.
    #[must_use]
    pub const fn is_persisting(&self) -> bool {
        matches!(self, Self::Persisting(_))
    }

    /// Short name of the state, for logs and the status bar.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::PendingConfirm(_) => "awaiting confirmation",
            Self::Persisting(_) => "saving",
        }
    }
}

/// What a drop did.
#[derive(Debug)]
pub enum DropOutcome {
    /// No drag was under way.
    NoDrag,
    /// Dropped back onto the source cell; nothing changed.
    SameCell,
    /// The value was written into the target.
    Copied {
        /// Source slot.
        source: PlacingNumber,
        /// Target slot.
        target: PlacingNumber,
    },
    /// Free text moved from source to target without a ledger write.
    Relocated {
        /// Source slot.
        source: PlacingNumber,
        /// Target slot.
        target: PlacingNumber,
    },
    /// A linked move now waits for confirmation.
    AwaitingConfirmation(PendingMove),
    /// The drop data was unusable; nothing changed.
    Rejected(ProtocolError),
}

impl DropOutcome {
    /// Returns `true` if any cell changed.
    #[must_use]
    pub const fn mutated(&self) -> bool {
        matches!(self, Self::Copied { .. } | Self::Relocated { .. })
    }

    /// The notice the host should show, if any.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::NoDrag | Self::SameCell | Self::AwaitingConfirmation(_) => None,
            Self::Copied { source, target } => Some(Notice::Copied {
                source: *source,
                target: *target,
            }),
            Self::Relocated { source, target } => Some(Notice::Relocated {
                source: *source,
                target: *target,
            }),
            Self::Rejected(err) => Some(Notice::CopyFailed {
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use chrono::{TimeZone, Utc};

    fn pending() -> PendingMove {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        PendingMove {
            source_index: 12,
            target_index: 15,
            value: "BORROWED\n2024-05-01".to_string(),
            record: Record::new(7, RecordType::Borrowed, at, Some(12)),
            transaction: None,
        }
    }

    #[test]
    fn transfer_mode_parses_case_insensitively() {
        assert_eq!("COPY".parse::<TransferMode>(), Ok(TransferMode::Copy));
        assert_eq!(" move ".parse::<TransferMode>(), Ok(TransferMode::Move));
        assert!("swap".parse::<TransferMode>().is_err());
    }

    #[test]
    fn transfer_mode_json_format() {
        let json = serde_json::to_string(&TransferMode::Copy).expect("serialize");
        assert_eq!(json, r#""copy""#);
    }

    #[test]
    fn pending_move_request_targets_record() {
        let request = pending().request();
        assert_eq!(
            request,
            MoveRequest {
                record_id: 7,
                source_index: 12,
                target_index: 15,
            }
        );
    }

    #[test]
    fn pending_move_details_without_transaction() {
        assert_eq!(pending().details(), "BORROWED on 2024-05-01");
    }

    #[test]
    fn state_accessors() {
        let state = TransferState::Dragging {
            payload: DragPayload::new(3, "x", None),
            hover: Some(4),
        };
        assert_eq!(state.drag_source(), Some(3));
        assert_eq!(state.hover_target(), Some(4));
        assert!(state.pending().is_none());

        let state = TransferState::Persisting(pending());
        assert!(state.is_persisting());
        assert_eq!(state.pending().map(|p| p.target_index), Some(15));
        assert_eq!(state.label(), "saving");
        assert!(TransferState::default().is_idle());
    }

    #[test]
    fn rejected_drop_produces_copy_failed_notice() {
        let outcome = DropOutcome::Rejected(ProtocolError::InvalidPayload {
            reason: "dragged value is empty".to_string(),
        });
        assert!(!outcome.mutated());
        assert!(matches!(outcome.notice(), Some(Notice::CopyFailed { .. })));
    }
}

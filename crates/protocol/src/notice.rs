//! User-facing notices produced by grid operations.
//!
//! Notices are transient: the host shows them briefly and they never block
//! further interaction.

use std::fmt;

use crate::record::{PlacingNumber, RecordId};

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// The operation went through.
    Success,
    /// The operation was refused or failed; nothing changed.
    Failure,
    /// Informational only.
    Info,
}

/// A transient message summarizing the outcome of a transfer.
///
/// # Examples
///
/// ```
/// use libcard_protocol::Notice;
///
/// let notice = Notice::Copied { source: 12, target: 20 };
/// assert_eq!(notice.title(), "Content Copied");
/// assert_eq!(notice.description(), "Copied from cell 12 to cell 20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Content was duplicated into another cell.
    Copied {
        /// Cell the content came from.
        source: PlacingNumber,
        /// Cell the content was written to.
        target: PlacingNumber,
    },
    /// A drop could not be applied.
    CopyFailed {
        /// What went wrong.
        reason: String,
    },
    /// Free text was moved between cells without touching the ledger.
    Relocated {
        /// Cell the content came from.
        source: PlacingNumber,
        /// Cell the content now lives in.
        target: PlacingNumber,
    },
    /// A record's placing number was updated in the ledger.
    Moved {
        /// The record that moved.
        record_id: RecordId,
        /// Its previous slot.
        source: PlacingNumber,
        /// Its new slot.
        target: PlacingNumber,
        /// Book and record metadata.
        details: String,
    },
    /// The ledger refused or failed to apply a move.
    MoveFailed {
        /// The backend's message.
        reason: String,
    },
    /// A pending move was dismissed before anything was written.
    MoveCancelled {
        /// Cell the drag started from.
        source: PlacingNumber,
        /// Cell the drop targeted.
        target: PlacingNumber,
    },
    /// The ledger snapshot was reloaded.
    Refreshed {
        /// How many transactions the ledger returned.
        transactions: usize,
    },
    /// The ledger snapshot could not be reloaded.
    RefreshFailed {
        /// The backend's message.
        reason: String,
    },
}

impl Notice {
    /// Short headline for the notice.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Copied { .. } => "Content Copied",
            Self::CopyFailed { .. } => "Copy Failed",
            Self::Relocated { .. } => "Cell Relocated",
            Self::Moved { .. } => "Record Moved",
            Self::MoveFailed { .. } => "Move Failed",
            Self::MoveCancelled { .. } => "Move Cancelled",
            Self::Refreshed { .. } => "Ledger Refreshed",
            Self::RefreshFailed { .. } => "Refresh Failed",
        }
    }

    /// One-line explanation shown under the title.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Copied { source, target } => {
                format!("Copied from cell {source} to cell {target}")
            }
            Self::CopyFailed { reason } => {
                format!("Failed to copy content between cells: {reason}")
            }
            Self::Relocated { source, target } => {
                format!("Moved text from cell {source} to cell {target}")
            }
            Self::Moved {
                record_id,
                source,
                target,
                details,
            } => format!("Record #{record_id} moved from cell {source} to cell {target}: {details}"),
            Self::MoveFailed { reason } => format!("Placing number was not updated: {reason}"),
            Self::MoveCancelled { source, target } => {
                format!("Cell {source} was not moved to cell {target}")
            }
            Self::Refreshed { transactions } => format!("Loaded {transactions} transactions"),
            Self::RefreshFailed { reason } => format!("Could not reload the ledger: {reason}"),
        }
    }

    /// Whether this notice reports success or failure.
    #[must_use]
    pub const fn kind(&self) -> NoticeKind {
        match self {
            Self::Copied { .. } | Self::Relocated { .. } | Self::Moved { .. } => {
                NoticeKind::Success
            }
            Self::CopyFailed { .. } | Self::MoveFailed { .. } | Self::RefreshFailed { .. } => {
                NoticeKind::Failure
            }
            Self::MoveCancelled { .. } | Self::Refreshed { .. } => NoticeKind::Info,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

//! Shared protocol types for the libcard application.
//!
//! This crate defines the core of a library borrowing card: the cells,
//! the ledger records behind them, the card grid controller, and the drag
//! transfer protocol that copies or moves content between cells.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`record`]: Ledger transactions and records
//! - [`cell`]: Cell content and its rendering rules
//! - [`index`]: Placing-number lookup over a ledger snapshot
//! - [`grid`]: The card grid controller
//! - [`payload`]: The drag payload and its transfer encoding
//! - [`transfer`]: Transfer modes and the drag/move lifecycle
//! - [`notice`]: Transient user-facing notices
//! - [`message`]: TUI event messages
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! Moving a linked record waits for confirmation and a ledger
//! acknowledgment before any cell changes:
//!
//! ```
//! use libcard_protocol::{CardGrid, CardLayout, DropOutcome, IndexHandle, TransactionIndex};
//! use libcard_protocol::dummy::dummy_transactions;
//!
//! let index = IndexHandle::fixed(TransactionIndex::new(dummy_transactions()));
//! let mut grid = CardGrid::new(CardLayout::default(), index);
//! grid.populate_from_index();
//!
//! grid.start_drag(10).unwrap();
//! assert!(matches!(grid.drop_on(13), DropOutcome::AwaitingConfirmation(_)));
//! assert_eq!(grid.value(13), "");
//!
//! let request = grid.confirm_move().unwrap();
//! assert_eq!(request.record_id, 1006);
//!
//! // The ledger accepted the update.
//! let mut ack = grid.transfer_state().pending().unwrap().record.clone();
//! ack.placing_number = Some(13);
//! grid.settle_move::<String>(Ok(ack)).unwrap();
//!
//! assert_eq!(grid.value(10), "");
//! assert_eq!(grid.value(13), "BORROWED\n2024-04-02");
//! ```

pub mod cell;
pub mod dummy;
pub mod error;
pub mod grid;
pub mod index;
pub mod message;
pub mod notice;
pub mod payload;
pub mod record;
pub mod transfer;

// Re-export primary types at crate root for convenience
pub use cell::{Cell, DISPLAY_WIDTH, ELLIPSIS};
pub use error::{ProtocolError, Result};
pub use grid::{CardGrid, CardHost, CardLayout, CellClass, GridMode, NoopHost};
pub use index::{IndexHandle, IndexPublisher, LinkedRecord, TransactionIndex, shared_index};
pub use message::Message;
pub use notice::{Notice, NoticeKind};
pub use payload::DragPayload;
pub use record::{PlacingNumber, Record, RecordId, RecordType, Transaction, TransactionId};
pub use transfer::{DropOutcome, MoveRequest, PendingMove, TransferMode, TransferState};

//! Error types for the libcard-protocol crate.
//!
//! This module defines the errors raised by the card grid and the drag
//! transfer protocol. None of them are fatal: every variant leaves the grid
//! exactly as it was before the failed operation.

use thiserror::Error;

use crate::record::PlacingNumber;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Drag transfer data could not be parsed.
    #[error("malformed drag payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// Drag transfer data parsed but describes an impossible drag.
    #[error("invalid drag payload: {reason}")]
    InvalidPayload {
        /// Why the payload was refused.
        reason: String,
    },

    /// A drag payload could not be encoded.
    #[error("failed to encode drag payload: {0}")]
    PayloadEncoding(#[source] serde_json::Error),

    /// The cell is empty or being edited and cannot be dragged.
    #[error("cell {0} cannot be dragged")]
    NotDraggable(PlacingNumber),

    /// A drag, confirmation, or backend write is already under way.
    #[error("a transfer is already in progress")]
    TransferInProgress,

    /// A confirmation was requested but no move is waiting for one.
    #[error("no move is awaiting confirmation")]
    NoPendingMove,

    /// An acknowledgment arrived but no move is being persisted.
    #[error("no move is being persisted")]
    NotPersisting,

    /// A status keyword outside the record vocabulary.
    #[error("unknown record type: {0}")]
    UnknownRecordType(String),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ProtocolError::NotDraggable(12);
        assert_eq!(err.to_string(), "cell 12 cannot be dragged");

        let err = ProtocolError::InvalidPayload {
            reason: "source index must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid drag payload: source index must be at least 1"
        );
    }

    #[test]
    fn malformed_payload_keeps_parse_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProtocolError::MalformedPayload(parse);
        assert!(err.to_string().starts_with("malformed drag payload"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

//! The drag payload and its transfer encoding.
//!
//! A payload is built when a drag starts and lives only for that gesture.
//! When it has to cross an untyped channel (for example a terminal paste
//! buffer or another process) it is encoded as JSON and validated again at
//! the drop boundary.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::index::LinkedRecord;
use crate::record::{PlacingNumber, Record, Transaction};

/// Everything a drop target needs to know about the dragged cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    /// Placing number of the cell being dragged.
    pub source_index: PlacingNumber,
    /// Text of the dragged cell.
    pub value: String,
    /// Transaction owning the linked record, if the cell is linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    /// Record occupying the source slot, if the cell is linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
}

impl DragPayload {
    /// Builds a payload from the source cell and its index lookup.
    ///
    /// An unlinked cell still produces a payload carrying only its text.
    #[must_use]
    pub fn new(
        source_index: PlacingNumber,
        value: impl Into<String>,
        linked: Option<LinkedRecord<'_>>,
    ) -> Self {
        let (transaction, record) = match linked {
            Some(linked) => (Some(linked.transaction.clone()), Some(linked.record.clone())),
            None => (None, None),
        };
        Self {
            source_index,
            value: value.into(),
            transaction,
            record,
        }
    }

    /// Returns `true` if the payload carries a backing record.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.record.is_some()
    }

    /// Encodes the payload for an untyped transfer channel.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PayloadEncoding`] if serialization fails.
    pub fn to_transfer_data(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ProtocolError::PayloadEncoding)
    }

    /// Decodes and validates transfer data received at a drop target.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedPayload`] when the data is not a
    /// payload at all, and [`ProtocolError::InvalidPayload`] when it parses
    /// but names slot 0 or carries no text.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_protocol::DragPayload;
    ///
    /// let payload = DragPayload::from_transfer_data(r#"{"source_index":4,"value":"note"}"#).unwrap();
    /// assert_eq!(payload.source_index, 4);
    /// assert!(!payload.is_linked());
    ///
    /// assert!(DragPayload::from_transfer_data("not json").is_err());
    /// ```
    pub fn from_transfer_data(data: &str) -> Result<Self> {
        let payload: Self = serde_json::from_str(data).map_err(ProtocolError::MalformedPayload)?;
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<()> {
        if self.source_index < 1 {
            return Err(ProtocolError::InvalidPayload {
                reason: "source index must be at least 1".to_string(),
            });
        }
        if self.value.trim().is_empty() {
            return Err(ProtocolError::InvalidPayload {
                reason: "dragged value is empty".to_string(),
            });
        }
        Ok(())
    }
}

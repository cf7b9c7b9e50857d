//! Dummy ledger data for testing and demonstration.
//!
//! This module provides a small, realistic borrowing history so the TUI can
//! run without a backend and tests have a shared fixture.
//!
//! # Examples
//!
//! ```
//! use libcard_protocol::dummy::dummy_transactions;
//!
//! let transactions = dummy_transactions();
//! assert_eq!(transactions.len(), 4);
//! ```

use chrono::{DateTime, TimeZone, Utc};

use crate::record::{PlacingNumber, Record, RecordId, RecordType, Transaction, TransactionId};

/// Student the demo ledger belongs to.
pub const DUMMY_STUDENT_ID: &str = "2024-00117";

/// A builder for transactions with a run of records.
///
/// This is an internal helper to reduce boilerplate when laying out a card.
struct TransactionBuilder {
    transaction: Transaction,
}

impl TransactionBuilder {
    fn new(id: TransactionId, title: &str, call_number: &str, accession: &str) -> Self {
        Self {
            transaction: Transaction::new(id, title, call_number, accession),
        }
    }

    /// Adds a record dated at noon UTC on the given day.
    fn record(
        mut self,
        id: RecordId,
        kind: RecordType,
        (year, month, day): (i32, u32, u32),
        slot: Option<PlacingNumber>,
    ) -> Self {
        let datetime: DateTime<Utc> = Utc
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_default();
        self.transaction = self
            .transaction
            .with_record(Record::new(id, kind, datetime, slot));
        self
    }

    fn build(self) -> Transaction {
        self.transaction
    }
}

/// Generates a sample borrowing history.
///
/// Four books, with records placed down the first column and into the second:
///
/// - **Dune**: borrowed (1), extended (2), returned (3)
/// - **The Left Hand of Darkness**: borrowed (4), returned (5)
/// - **Neuromancer**: borrowed (10), still out
/// - **Solaris**: borrowed (11), a subtraction correction (12), and one
///   record that was never placed
///
/// # Examples
///
/// ```
/// use libcard_protocol::dummy::dummy_transactions;
/// use libcard_protocol::TransactionIndex;
///
/// let index = TransactionIndex::new(dummy_transactions());
/// assert_eq!(index.placed().count(), 8);
/// assert!(index.find(10).is_some());
/// assert!(index.find(6).is_none());
/// ```
#[must_use]
pub fn dummy_transactions() -> Vec<Transaction> {
    vec![
        TransactionBuilder::new(101, "Dune", "PS3558 .E63 D8", "A-0193")
            .record(1001, RecordType::Borrowed, (2024, 2, 5), Some(1))
            .record(1002, RecordType::Extended, (2024, 2, 19), Some(2))
            .record(1003, RecordType::Returned, (2024, 3, 4), Some(3))
            .build(),
        TransactionBuilder::new(102, "The Left Hand of Darkness", "PS3562 .E42 L4", "A-0871")
            .record(1004, RecordType::Borrowed, (2024, 3, 11), Some(4))
            .record(1005, RecordType::Returned, (2024, 3, 25), Some(5))
            .build(),
        TransactionBuilder::new(103, "Neuromancer", "PS3557 .I2264 N48", "A-1140")
            .record(1006, RecordType::Borrowed, (2024, 4, 2), Some(10))
            .build(),
        TransactionBuilder::new(104, "Solaris", "PG7158 .L46 S6", "A-0457")
            .record(1007, RecordType::Borrowed, (2024, 4, 15), Some(11))
            .record(1008, RecordType::Subtraction, (2024, 4, 16), Some(12))
            .record(1009, RecordType::Cleared, (2024, 4, 17), None)
            .build(),
    ]
}

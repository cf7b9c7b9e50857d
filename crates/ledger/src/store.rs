//! The ledger seam.
//!
//! Everything that reads or writes the authoritative transaction list goes
//! through [`LedgerStore`]. The futures are `Send` so writes can run on a
//! spawned task while the terminal stays responsive.

use std::future::Future;

use libcard_protocol::{PlacingNumber, Record, RecordId, Transaction};

use crate::error::Result;

/// Read and write access to a student's borrowing ledger.
pub trait LedgerStore: Send + Sync {
    /// Fetches every transaction, records embedded, in ledger order.
    fn fetch_transactions(&self) -> impl Future<Output = Result<Vec<Transaction>>> + Send;

    /// Sets a record's placing number and returns the updated record.
    fn update_placing_number(
        &self,
        record_id: RecordId,
        placing_number: PlacingNumber,
    ) -> impl Future<Output = Result<Record>> + Send;
}

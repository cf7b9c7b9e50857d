//! An in-process ledger.
//!
//! [`InMemoryLedger`] backs the offline demo and the tests. It enforces the
//! one-record-per-slot rule the backend enforces, records every update it
//! accepts, and can be told to fail so error paths can be exercised.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use libcard_protocol::{PlacingNumber, Record, RecordId, Transaction};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::store::LedgerStore;

#[derive(Debug, Default)]
struct MemoryState {
    transactions: Vec<Transaction>,
    updates: Vec<(RecordId, PlacingNumber)>,
    fail_updates: Option<String>,
    fail_fetches: Option<String>,
}

/// A ledger held in memory.
///
/// # Examples
///
/// ```
/// use libcard_ledger::{InMemoryLedger, LedgerStore};
/// use libcard_protocol::dummy::dummy_transactions;
///
/// # async fn example() -> libcard_ledger::Result<()> {
/// let ledger = InMemoryLedger::new(dummy_transactions());
/// let record = ledger.update_placing_number(1006, 13).await?;
/// assert_eq!(record.placing_number, Some(13));
/// assert_eq!(ledger.updates(), vec![(1006, 13)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<MemoryState>,
    latency: Duration,
}

impl InMemoryLedger {
    /// Creates a ledger holding `transactions`.
    #[must_use]
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                transactions,
                ..MemoryState::default()
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delays every call by `latency`, to make in-flight states visible.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every following update fail with `message`, or succeed again
    /// when `None`.
    pub fn fail_updates(&self, message: Option<&str>) {
        self.state().fail_updates = message.map(str::to_string);
    }

    /// Makes every following fetch fail with `message`, or succeed again
    /// when `None`.
    pub fn fail_fetches(&self, message: Option<&str>) {
        self.state().fail_fetches = message.map(str::to_string);
    }

    /// Updates accepted so far, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<(RecordId, PlacingNumber)> {
        self.state().updates.clone()
    }

    /// A copy of the current transaction list.
    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state().transactions.clone()
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn apply_update(&self, record_id: RecordId, placing_number: PlacingNumber) -> Result<Record> {
        let mut state = self.state();
        if let Some(message) = state.fail_updates.clone() {
            return Err(unavailable("PATCH /records/", message));
        }

        let occupant = state
            .transactions
            .iter()
            .flat_map(|tx| tx.records.iter())
            .find(|r| r.placing_number == Some(placing_number) && r.id != record_id)
            .map(|r| r.id);
        if let Some(occupant) = occupant {
            return Err(Error::Conflict {
                placing_number,
                occupant,
            });
        }

        let record = state
            .transactions
            .iter_mut()
            .flat_map(|tx| tx.records.iter_mut())
            .find(|r| r.id == record_id)
            .ok_or(Error::RecordNotFound(record_id))?;
        record.placing_number = Some(placing_number);
        let updated = record.clone();

        state.updates.push((record_id, placing_number));
        Ok(updated)
    }
}

fn unavailable(endpoint: &str, message: String) -> Error {
    Error::Api {
        endpoint: endpoint.to_string(),
        status: 503,
        message,
    }
}

impl LedgerStore for InMemoryLedger {
    #[instrument(skip(self))]
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        self.wait().await;
        let state = self.state();
        if let Some(message) = state.fail_fetches.clone() {
            return Err(unavailable("GET /transactions/", message));
        }
        debug!(count = state.transactions.len(), "served transactions");
        Ok(state.transactions.clone())
    }

    #[instrument(skip(self))]
    async fn update_placing_number(
        &self,
        record_id: RecordId,
        placing_number: PlacingNumber,
    ) -> Result<Record> {
        self.wait().await;
        let record = self.apply_update(record_id, placing_number)?;
        debug!(record_id, placing_number, "placing number updated");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libcard_protocol::dummy::dummy_transactions;

    #[tokio::test]
    async fn update_moves_record() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        let record = ledger.update_placing_number(1006, 20).await.expect("update");

        assert_eq!(record.id, 1006);
        assert_eq!(record.placing_number, Some(20));
        let stored = ledger.transactions();
        assert_eq!(stored[2].records[0].placing_number, Some(20));
    }

    #[tokio::test]
    async fn update_to_own_slot_is_allowed() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        let record = ledger.update_placing_number(1006, 10).await.expect("update");
        assert_eq!(record.placing_number, Some(10));
    }

    #[tokio::test]
    async fn update_into_occupied_slot_conflicts() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        let err = ledger.update_placing_number(1006, 1).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Conflict {
                placing_number: 1,
                occupant: 1001
            }
        ));
        assert!(ledger.updates().is_empty());
    }

    #[tokio::test]
    async fn update_unknown_record_is_not_found() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        let err = ledger.update_placing_number(9999, 30).await.unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(9999)));
    }

    #[tokio::test]
    async fn unplaced_record_can_be_placed() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        let record = ledger.update_placing_number(1009, 13).await.expect("update");
        assert_eq!(record.placing_number, Some(13));
    }

    #[tokio::test]
    async fn injected_failures_leave_data_untouched() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        ledger.fail_updates(Some("backend offline"));

        let err = ledger.update_placing_number(1006, 20).await.unwrap_err();
        assert_eq!(err.to_string(), "backend offline (HTTP 503)");
        assert_eq!(ledger.transactions(), dummy_transactions());

        ledger.fail_updates(None);
        assert!(ledger.update_placing_number(1006, 20).await.is_ok());
    }

    #[tokio::test]
    async fn injected_fetch_failure() {
        let ledger = InMemoryLedger::new(dummy_transactions());
        ledger.fail_fetches(Some("timeout"));
        assert!(ledger.fetch_transactions().await.is_err());
        ledger.fail_fetches(None);
        assert_eq!(ledger.fetch_transactions().await.expect("fetch").len(), 4);
    }
}

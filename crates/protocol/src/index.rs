//! Transaction index: which record currently occupies a placing number.
//!
//! The index is a read-only projection of the ledger's transaction list.
//! It is never edited in place; a refresh replaces the whole snapshot. The
//! [`IndexPublisher`] owns the write side and hands out [`IndexHandle`]s to
//! the grids that read it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::record::{PlacingNumber, Record, Transaction, describe_record};

/// A record together with the transaction that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedRecord<'a> {
    /// The owning transaction.
    pub transaction: &'a Transaction,
    /// The record occupying the slot.
    pub record: &'a Record,
}

impl LinkedRecord<'_> {
    /// Describes the record with its book metadata.
    #[must_use]
    pub fn describe(&self) -> String {
        self.transaction.describe(self.record)
    }
}

/// Finds the record whose placing number is `n`.
///
/// Scans transactions in order, then each transaction's records in order,
/// and returns the first match. `None` means the cell is unlinked (blank or
/// typed by hand); it is not a fault.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use libcard_protocol::{Record, RecordType, Transaction, index::find_by_placing_number};
///
/// let tx = Transaction::new(1, "Dune", "PS3558", "A-1")
///     .with_record(Record::new(7, RecordType::Borrowed, Utc::now(), Some(12)));
/// let transactions = vec![tx];
///
/// let linked = find_by_placing_number(&transactions, 12).unwrap();
/// assert_eq!(linked.record.id, 7);
/// assert!(find_by_placing_number(&transactions, 13).is_none());
/// assert!(find_by_placing_number(&[], 12).is_none());
/// ```
#[must_use]
pub fn find_by_placing_number(
    transactions: &[Transaction],
    n: PlacingNumber,
) -> Option<LinkedRecord<'_>> {
    transactions.iter().find_map(|transaction| {
        transaction
            .records
            .iter()
            .find(|record| record.placing_number == Some(n))
            .map(|record| LinkedRecord {
                transaction,
                record,
            })
    })
}

/// Snapshot of the ledger's transactions, searchable by placing number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionIndex {
    transactions: Vec<Transaction>,
}

impl TransactionIndex {
    /// Builds an index over `transactions`.
    #[must_use]
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Returns the transactions in ledger order.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Returns `true` if no transactions are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Looks up the record at `n`. See [`find_by_placing_number`].
    #[must_use]
    pub fn find(&self, n: PlacingNumber) -> Option<LinkedRecord<'_>> {
        find_by_placing_number(&self.transactions, n)
    }

    /// Iterates over every placed record with its transaction.
    pub fn placed(&self) -> impl Iterator<Item = (PlacingNumber, LinkedRecord<'_>)> {
        self.transactions.iter().flat_map(|transaction| {
            transaction.records.iter().filter_map(move |record| {
                record.placing_number.map(|n| {
                    (
                        n,
                        LinkedRecord {
                            transaction,
                            record,
                        },
                    )
                })
            })
        })
    }

    /// Describes the record at `n`, if any.
    #[must_use]
    pub fn describe(&self, n: PlacingNumber) -> Option<String> {
        self.find(n).map(|linked| linked.describe())
    }

    /// Returns placing numbers held by more than one record.
    ///
    /// The ledger should never produce any; a non-empty result means the
    /// backend broke the one-record-per-slot rule and lookups there resolve
    /// to the first record in ledger order.
    #[must_use]
    pub fn collisions(&self) -> Vec<PlacingNumber> {
        let mut seen = std::collections::BTreeMap::<PlacingNumber, usize>::new();
        for (n, _) in self.placed() {
            *seen.entry(n).or_default() += 1;
        }
        seen.into_iter()
            .filter_map(|(n, count)| (count > 1).then_some(n))
            .collect()
    }
}

/// Describes a record found through an index, falling back to the bare
/// record when the transaction is unknown.
#[must_use]
pub fn describe_linked(transaction: Option<&Transaction>, record: &Record) -> String {
    match transaction {
        Some(transaction) => transaction.describe(record),
        None => describe_record(record),
    }
}

/// Read side of the shared index.
///
/// Cloning a handle is cheap; every clone observes the latest published
/// snapshot.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    rx: watch::Receiver<Arc<TransactionIndex>>,
}

impl IndexHandle {
    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TransactionIndex> {
        Arc::clone(&self.rx.borrow())
    }

    /// Creates a handle over a fixed index with no publisher.
    ///
    /// Useful for read-only views and tests.
    #[must_use]
    pub fn fixed(index: TransactionIndex) -> Self {
        let (_, handle) = shared_index(index);
        handle
    }
}

/// Write side of the shared index.
#[derive(Debug)]
pub struct IndexPublisher {
    tx: watch::Sender<Arc<TransactionIndex>>,
}

impl IndexPublisher {
    /// Replaces the snapshot every handle observes.
    pub fn publish(&self, index: TransactionIndex) {
        self.tx.send_replace(Arc::new(index));
    }

    /// Returns a new handle onto this publisher's snapshots.
    #[must_use]
    pub fn handle(&self) -> IndexHandle {
        IndexHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TransactionIndex> {
        Arc::clone(&self.tx.borrow())
    }
}

/// Creates a publisher and a first handle sharing `initial`.
///
/// # Examples
///
/// ```
/// use libcard_protocol::index::{TransactionIndex, shared_index};
///
/// let (publisher, handle) = shared_index(TransactionIndex::default());
/// assert!(handle.snapshot().is_empty());
///
/// publisher.publish(TransactionIndex::new(vec![]));
/// assert!(handle.snapshot().is_empty());
/// ```
#[must_use]
pub fn shared_index(initial: TransactionIndex) -> (IndexPublisher, IndexHandle) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (IndexPublisher { tx }, IndexHandle { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;
    use chrono::{TimeZone, Utc};

    fn record(id: i64, placing: Option<PlacingNumber>) -> Record {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        Record::new(id, RecordType::Borrowed, at, placing)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new(1, "Dune", "PS3558", "A-1")
                .with_record(record(10, Some(1)))
                .with_record(record(11, None)),
            Transaction::new(2, "Emma", "PR4034", "A-2")
                .with_record(record(20, Some(2)))
                .with_record(record(21, Some(5))),
        ]
    }

    #[test]
    fn finds_record_in_later_transaction() {
        let transactions = sample();
        let linked = find_by_placing_number(&transactions, 5).expect("linked");
        assert_eq!(linked.transaction.id, 2);
        assert_eq!(linked.record.id, 21);
    }

    #[test]
    fn unplaced_records_never_match() {
        let index = TransactionIndex::new(sample());
        assert!(index.find(0).is_none());
        assert!(index.find(3).is_none());
    }

    #[test]
    fn first_match_wins_on_collision() {
        let mut transactions = sample();
        transactions[1].records.push(record(22, Some(1)));
        let index = TransactionIndex::new(transactions);

        assert_eq!(index.find(1).map(|l| l.record.id), Some(10));
        assert_eq!(index.collisions(), vec![1]);
    }

    #[test]
    fn placed_skips_unplaced_records() {
        let index = TransactionIndex::new(sample());
        let placed: Vec<_> = index.placed().map(|(n, l)| (n, l.record.id)).collect();
        assert_eq!(placed, vec![(1, 10), (2, 20), (5, 21)]);
    }

    #[test]
    fn describe_uses_book_metadata() {
        let index = TransactionIndex::new(sample());
        assert_eq!(
            index.describe(2).as_deref(),
            Some("Emma (call no. PR4034, accession A-2): BORROWED on 2024-05-01")
        );
        assert!(index.describe(9).is_none());
    }

    #[test]
    fn handles_observe_published_snapshots() {
        let (publisher, handle) = shared_index(TransactionIndex::default());
        let second = publisher.handle();
        assert!(handle.snapshot().is_empty());

        publisher.publish(TransactionIndex::new(sample()));

        assert_eq!(handle.snapshot().transactions().len(), 2);
        assert_eq!(second.snapshot().transactions().len(), 2);
        assert_eq!(publisher.snapshot().transactions().len(), 2);
    }

    #[test]
    fn fixed_handle_keeps_its_snapshot() {
        let handle = IndexHandle::fixed(TransactionIndex::new(sample()));
        assert!(handle.snapshot().find(1).is_some());
    }
}

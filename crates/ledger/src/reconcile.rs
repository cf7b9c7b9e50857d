//! The reconciliation writer.
//!
//! [`Reconciler`] sits between a [`LedgerStore`] and the shared transaction
//! index. It persists confirmed moves, and republishes the index from the
//! ledger afterwards so every grid sees the record in its new slot.

use std::fmt;
use std::sync::Arc;

use libcard_protocol::{
    CardGrid, IndexHandle, IndexPublisher, MoveRequest, Notice, Record, TransactionIndex,
    shared_index,
};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::store::LedgerStore;

/// Writes placing numbers and keeps the shared index in step with the
/// ledger.
///
/// Clones share the store and the index.
pub struct Reconciler<S> {
    store: Arc<S>,
    publisher: Arc<IndexPublisher>,
}

impl<S> Clone for Reconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<S> fmt::Debug for Reconciler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("transactions", &self.publisher.snapshot().transactions().len())
            .finish_non_exhaustive()
    }
}

impl<S: LedgerStore> Reconciler<S> {
    /// Creates a writer over `store` with an empty index.
    ///
    /// Call [`refresh`](Self::refresh) to load the ledger.
    #[must_use]
    pub fn new(store: S) -> Self {
        let (publisher, _) = shared_index(TransactionIndex::default());
        Self {
            store: Arc::new(store),
            publisher: Arc::new(publisher),
        }
    }

    /// A read handle onto the index this writer maintains.
    #[must_use]
    pub fn handle(&self) -> IndexHandle {
        self.publisher.handle()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reloads the index from the ledger. Returns the transaction count.
    ///
    /// # Errors
    ///
    /// Returns the store's error; the previous snapshot stays published.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize> {
        let transactions = self.store.fetch_transactions().await?;
        let index = TransactionIndex::new(transactions);
        let collisions = index.collisions();
        if !collisions.is_empty() {
            warn!(?collisions, "ledger has several records in one slot");
        }
        let count = index.transactions().len();
        self.publisher.publish(index);
        info!(count, "index refreshed");
        Ok(count)
    }

    /// Persists a confirmed move, then refreshes the index.
    ///
    /// A failed refresh after a successful write is logged and does not
    /// fail the move.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write is refused or never arrives.
    #[instrument(skip(self), fields(record_id = request.record_id, target = request.target_index))]
    pub async fn write(&self, request: MoveRequest) -> Result<Record> {
        let record = self
            .store
            .update_placing_number(request.record_id, request.target_index)
            .await?;
        info!(source = request.source_index, "move persisted");

        if let Err(err) = self.refresh().await {
            warn!(error = %err, "index refresh after move failed");
        }
        Ok(record)
    }

    /// Confirms the grid's pending move, persists it, and settles the grid
    /// with the outcome.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the grid has no move awaiting
    /// confirmation. Ledger failures are not errors here; they come back as
    /// a [`Notice::MoveFailed`] with the grid unchanged.
    pub async fn confirm_and_apply(&self, grid: &mut CardGrid) -> libcard_protocol::Result<Notice> {
        let request = grid.confirm_move()?;
        let ack = self.write(request).await;
        grid.settle_move(ack)
    }
}

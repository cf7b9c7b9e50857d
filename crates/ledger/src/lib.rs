//! Ledger access for libcard.
//!
//! This crate connects the card grid to the authoritative borrowing ledger:
//! reading the transaction list that feeds the shared index, and writing a
//! record's placing number when a move is confirmed.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - [`LedgerStore`]: The seam every ledger implementation sits behind
//! - [`RestLedger`] and [`LedgerEndpoint`]: The REST backend client
//! - [`InMemoryLedger`]: An in-process ledger for offline use and tests
//! - [`Reconciler`]: Persists confirmed moves and refreshes the index
//! - [`Error`]: Error types for ledger operations
//!
//! # Authentication
//!
//! The REST client sends `Authorization: Bearer <key>` when a key is
//! configured. Keys are handled with [`secrecy::SecretString`] so they are
//! never logged.
//!
//! # Examples
//!
//! Confirming a move against an in-memory ledger:
//!
//! ```
//! use libcard_ledger::{InMemoryLedger, Reconciler};
//! use libcard_protocol::{CardGrid, CardLayout};
//! use libcard_protocol::dummy::dummy_transactions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reconciler = Reconciler::new(InMemoryLedger::new(dummy_transactions()));
//! reconciler.refresh().await?;
//!
//! let mut grid = CardGrid::new(CardLayout::default(), reconciler.handle());
//! grid.populate_from_index();
//! grid.start_drag(10)?;
//! grid.drop_on(13);
//!
//! let notice = reconciler.confirm_and_apply(&mut grid).await?;
//! println!("{notice}");
//! # Ok(())
//! # }
//! ```

mod client;
pub mod error;
mod memory;
mod reconcile;
mod store;

pub use client::{LedgerEndpoint, RestLedger};
pub use error::{Error, Result};
pub use memory::InMemoryLedger;
pub use reconcile::Reconciler;
pub use store::LedgerStore;

//! Terminal UI for the libcard application.
//!
//! This crate provides a Ratatui-based terminal interface for working a
//! library borrowing card: editing cells, dragging content between them, and
//! confirming moves that are written back to the ledger.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`app`]: Main application struct and run loop
//! - [`state`]: Cursor, help overlay and notice queue
//! - [`host`]: Cell styling and callbacks backed by the ledger index
//! - [`layout`]: Screen areas and minimum sizes
//! - [`terminal`]: Terminal setup, teardown, and panic handling
//! - [`event`]: Event handling and key mappings
//! - [`widgets`]: Rendering of the card, dialog, status bar and help
//!
//! # Example
//!
//! ```no_run
//! use libcard_config::CardConfig;
//! use libcard_ledger::{InMemoryLedger, Reconciler};
//! use libcard_protocol::dummy::dummy_transactions;
//! use libcard_tui::{App, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!
//!     let reconciler = Reconciler::new(InMemoryLedger::new(dummy_transactions()));
//!     let mut app = App::new(reconciler, &CardConfig::default());
//!     let result = app.run(&mut terminal).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod host;
pub mod layout;
pub mod state;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::{App, BackgroundEvent};
pub use state::AppState;

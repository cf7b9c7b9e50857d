//! libcard - A library borrower's card editor.
//!
//! This is the main binary that launches the TUI application.

use std::fs::{self, File};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use libcard_config::{Config, LedgerConfig, auth::resolve_api_key, persistence::log_file_path};
use libcard_ledger::{InMemoryLedger, LedgerEndpoint, LedgerStore, Reconciler, RestLedger};
use libcard_protocol::dummy::dummy_transactions;
use libcard_tui::{App, terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_FILTER_ENV: &str = "LIBCARD_LOG";

/// Simulated round trip of the demo ledger, so the saving state is visible.
const DEMO_LATENCY: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    // The terminal belongs to the UI, so logs go to a file
    init_tracing()?;

    if config.ledger.is_remote() {
        let ledger = RestLedger::new(endpoint(&config.ledger)?)?;
        info!(url = ledger.base_url(), "using remote ledger");
        run(ledger, &config).await
    } else {
        info!("no ledger url configured, using the demo ledger");
        let ledger = InMemoryLedger::new(dummy_transactions()).with_latency(DEMO_LATENCY);
        run(ledger, &config).await
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn endpoint(ledger: &LedgerConfig) -> anyhow::Result<LedgerEndpoint> {
    let base_url = ledger
        .url
        .clone()
        .context("remote ledger selected without a url")?;
    Ok(LedgerEndpoint {
        base_url,
        student_id: ledger.student_id.clone(),
        api_key: resolve_api_key(ledger.api_key.as_deref()),
        timeout: ledger.timeout(),
    })
}

async fn run<S: LedgerStore + 'static>(ledger: S, config: &Config) -> anyhow::Result<()> {
    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();

    let mut terminal = terminal::setup_terminal()?;
    let mut app = App::new(Reconciler::new(ledger), &config.card);

    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}

//! Main application struct and run loop.
//!
//! This module provides the `App` struct which orchestrates the TUI
//! application lifecycle: mapping messages to grid operations, running
//! ledger calls off the event loop, and rendering.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Local;
use libcard_config::CardConfig;
use libcard_ledger::{LedgerStore, Reconciler};
use libcard_protocol::{CardGrid, DropOutcome, Message, Notice, PlacingNumber, Record};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    AppState,
    event::{event_to_message, poll_event},
    host::LedgerHost,
    layout::{MIN_HEIGHT, MIN_HEIGHT_WITH_HEADER, MIN_WIDTH, screen_areas},
    terminal::AppTerminal,
    widgets::{
        cell_at, render_card, render_confirm_dialog, render_help_overlay, render_status_bar,
    },
};

/// Two presses on one cell within this window count as a double click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Results of ledger calls that ran off the event loop.
#[derive(Debug)]
pub enum BackgroundEvent {
    /// The write behind a confirmed move finished.
    MoveSettled(libcard_ledger::Result<Record>),
    /// A refresh of the shared index finished.
    Refreshed(libcard_ledger::Result<usize>),
}

#[derive(Debug, Default)]
struct Pointer {
    /// Cell under the last press, until it turns into a drag or a release.
    pressed: Option<PlacingNumber>,
    last_click: Option<(PlacingNumber, Instant)>,
}

/// The main application struct.
///
/// Owns the card state and the reconciliation writer. Ledger calls are
/// spawned on the tokio runtime and their results come back over a channel,
/// so cells only change once the acknowledgment has been applied on the
/// event loop.
pub struct App<S> {
    state: AppState,
    reconciler: Reconciler<S>,
    should_quit: bool,
    /// Last known terminal area, used for mouse hit-testing.
    last_area: Rect,
    /// Whether the header was shown in the last render (affects hit-testing).
    header_visible: bool,
    pointer: Pointer,
    background_tx: mpsc::UnboundedSender<BackgroundEvent>,
    background_rx: mpsc::UnboundedReceiver<BackgroundEvent>,
}

impl<S> fmt::Debug for App<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("reconciler", &self.reconciler)
            .field("should_quit", &self.should_quit)
            .field("last_area", &self.last_area)
            .finish_non_exhaustive()
    }
}

impl<S: LedgerStore + 'static> App<S> {
    /// Creates an application showing the index `reconciler` maintains,
    /// laid out per `card`.
    ///
    /// Cells are filled from whatever the index holds now; [`run`](Self::run)
    /// refreshes it from the ledger first thing.
    ///
    /// # Examples
    ///
    /// ```
    /// use libcard_config::CardConfig;
    /// use libcard_ledger::{InMemoryLedger, Reconciler};
    /// use libcard_protocol::dummy::dummy_transactions;
    /// use libcard_tui::App;
    ///
    /// let reconciler = Reconciler::new(InMemoryLedger::new(dummy_transactions()));
    /// let app = App::new(reconciler, &CardConfig::default());
    /// assert_eq!(app.state().cursor_index(), 1);
    /// ```
    #[must_use]
    pub fn new(reconciler: Reconciler<S>, card: &CardConfig) -> Self {
        let index = reconciler.handle();
        let mut grid = CardGrid::new(card.layout(), index.clone())
            .with_transfer_mode(card.transfer_mode)
            .with_mode(card.mode)
            .with_display_width(card.display_width)
            .with_host(LedgerHost::new(index));
        grid.populate_from_index();

        let (background_tx, background_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(grid),
            reconciler,
            should_quit: false,
            last_area: Rect::default(),
            header_visible: true,
            pointer: Pointer::default(),
            background_tx,
            background_rx,
        }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The reconciliation writer behind the card.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Returns `true` once the user has asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Updates the application state based on a message.
    ///
    /// When the help overlay is visible, most messages are intercepted to
    /// dismiss the help instead of their normal action. Only `Quit` and
    /// `ToggleHelp` work normally when help is shown.
    pub fn update(&mut self, msg: Message) {
        if self.state.help_visible {
            match msg {
                Message::Quit => self.should_quit = true,
                Message::ToggleHelp => self.state.toggle_help(),
                _ => {
                    let _ = self.state.dismiss_help();
                }
            }
            return;
        }

        match msg {
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => {
                self.state.grid.commit_edit();
                self.state.toggle_help();
            }
            Message::NavigateLeft
            | Message::NavigateRight
            | Message::NavigateUp
            | Message::NavigateDown => self.navigate(&msg),
            Message::Activate => self.activate(),
            Message::Escape => self.escape(),
            Message::Refresh => self.spawn_refresh(),
            Message::ToggleStrike => {
                let n = self.state.cursor_index();
                self.state.grid.double_click(n);
            }
            Message::PickUpOrDrop => self.pick_up_or_drop(),
            Message::ToggleTransferMode => {
                let next = self.state.grid.transfer_mode().toggled();
                if self.state.grid.set_transfer_mode(next) {
                    info!(mode = next.display_name(), "transfer mode changed");
                } else {
                    debug!("transfer mode is fixed while a transfer is under way");
                }
            }
            Message::ToggleGridMode => {
                let next = self.state.grid.mode().toggled();
                self.state.grid.set_mode(next);
                info!(mode = next.display_name(), "grid mode changed");
            }
            Message::StampDate => {
                let n = self.state.cursor_index();
                let today = Local::now().date_naive();
                if !self.state.grid.select_date(n, today) {
                    debug!(index = n, "date stamp not offered here");
                }
            }
            Message::Insert => {
                let n = self.state.cursor_index();
                if !self.state.grid.insert_click(n) {
                    debug!(index = n, "insert not offered here");
                }
            }
            Message::PasteTransferData { data } => {
                let n = self.state.cursor_index();
                let outcome = self.state.grid.drop_transfer_data(n, &data);
                self.apply_outcome(outcome);
            }
            Message::Confirm => self.confirm_move(),
            Message::Cancel => self.cancel_move(),
            Message::EditInput { ch } => self.state.grid.edit_input(ch),
            Message::EditNewline => self.state.grid.edit_input('\n'),
            Message::EditBackspace => self.state.grid.edit_backspace(),
            Message::EditPaste { text } => {
                for ch in text.replace("\r\n", "\n").chars() {
                    self.state.grid.edit_input(if ch == '\r' { '\n' } else { ch });
                }
            }
            Message::MouseDown { column, row } => self.mouse_down(column, row),
            Message::MouseDrag { column, row } => self.mouse_drag(column, row),
            Message::MouseUp { column, row } => self.mouse_up(column, row),
        }
    }

    /// Moving focus commits an edit, like a blur; during a drag the cursor
    /// cell becomes the hovered target.
    fn navigate(&mut self, msg: &Message) {
        self.state.grid.commit_edit();
        match msg {
            Message::NavigateLeft => self.state.navigate_left(),
            Message::NavigateRight => self.state.navigate_right(),
            Message::NavigateUp => self.state.navigate_up(),
            Message::NavigateDown => self.state.navigate_down(),
            _ => return,
        }
        let n = self.state.cursor_index();
        self.state.grid.hover(n);
    }

    fn activate(&mut self) {
        if self.state.grid.commit_edit().is_some() {
            return;
        }
        let n = self.state.cursor_index();
        if let Err(err) = self.state.grid.click(n) {
            debug!(index = n, error = %err, "edit refused");
        }
    }

    fn escape(&mut self) {
        if self.state.grid.commit_edit().is_some() {
            return;
        }
        if self.state.grid.cancel_drag() {
            debug!("drag cancelled");
            return;
        }
        self.cancel_move();
    }

    fn pick_up_or_drop(&mut self) {
        let n = self.state.cursor_index();
        let transfer = self.state.grid.transfer_state();
        if transfer.is_idle() {
            match self.state.grid.start_drag(n) {
                Ok(payload) => debug!(index = n, linked = payload.is_linked(), "picked up"),
                Err(err) => debug!(index = n, error = %err, "nothing to pick up"),
            }
        } else if transfer.drag_source().is_some() {
            let outcome = self.state.grid.drop_on(n);
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: DropOutcome) {
        if let DropOutcome::AwaitingConfirmation(pending) = &outcome {
            info!(
                record_id = pending.record.id,
                source = pending.source_index,
                target = pending.target_index,
                "move awaiting confirmation"
            );
        }
        if let Some(notice) = outcome.notice() {
            self.push_notice(notice);
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        info!(%notice, "notice");
        self.state.push_notice(notice);
    }

    /// Issues the ledger write for the pending move. Confirming while a write
    /// is already in flight does nothing.
    fn confirm_move(&mut self) {
        let request = match self.state.grid.confirm_move() {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "nothing to confirm");
                return;
            }
        };

        let reconciler = self.reconciler.clone();
        let tx = self.background_tx.clone();
        tokio::spawn(async move {
            let ack = reconciler.write(request).await;
            if tx.send(BackgroundEvent::MoveSettled(ack)).is_err() {
                warn!("move settled after the app closed");
            }
        });
    }

    fn cancel_move(&mut self) {
        match self.state.grid.cancel_move() {
            Ok(notice) => self.push_notice(notice),
            Err(err) => debug!(error = %err, "nothing to cancel"),
        }
    }

    fn spawn_refresh(&self) {
        let reconciler = self.reconciler.clone();
        let tx = self.background_tx.clone();
        tokio::spawn(async move {
            let result = reconciler.refresh().await;
            if tx.send(BackgroundEvent::Refreshed(result)).is_err() {
                warn!("refresh finished after the app closed");
            }
        });
    }

    /// Applies the result of a background ledger call.
    pub fn handle_background(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::MoveSettled(ack) => match self.state.grid.settle_move(ack) {
                Ok(notice) => self.push_notice(notice),
                Err(err) => warn!(error = %err, "ledger answered a move nobody is waiting for"),
            },
            BackgroundEvent::Refreshed(Ok(transactions)) => {
                let written = self.state.grid.populate_from_index();
                debug!(written, "cells filled from the index");
                self.push_notice(Notice::Refreshed { transactions });
            }
            BackgroundEvent::Refreshed(Err(err)) => self.push_notice(Notice::RefreshFailed {
                reason: err.to_string(),
            }),
        }
    }

    /// Applies every background result that has already arrived. Returns how
    /// many were applied.
    pub fn drain_background(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.background_rx.try_recv() {
            self.handle_background(event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next background result and applies it.
    pub async fn next_background(&mut self) -> bool {
        match self.background_rx.recv().await {
            Some(event) => {
                self.handle_background(event);
                true
            }
            None => false,
        }
    }

    // --- Mouse gestures ---

    fn cell_under(&self, column: u16, row: u16) -> Option<PlacingNumber> {
        let areas = screen_areas(self.last_area, self.header_visible);
        cell_at(self.state.grid.layout(), areas.card, column, row)
    }

    fn mouse_down(&mut self, column: u16, row: u16) {
        let Some(n) = self.cell_under(column, row) else {
            return;
        };
        self.state.move_cursor_to(n);

        let now = Instant::now();
        let is_double = matches!(
            self.pointer.last_click,
            Some((last, at)) if last == n && now.duration_since(at) <= DOUBLE_CLICK_WINDOW
        );
        if is_double {
            self.pointer = Pointer::default();
            self.state.grid.double_click(n);
        } else {
            self.pointer.pressed = Some(n);
            self.pointer.last_click = Some((n, now));
        }
    }

    fn mouse_drag(&mut self, column: u16, row: u16) {
        let target = self.cell_under(column, row);

        if self.state.grid.transfer_state().is_idle() {
            match (self.pointer.pressed, target) {
                (Some(source), Some(target)) if source != target => {
                    self.pointer.pressed = None;
                    if let Err(err) = self.state.grid.start_drag(source) {
                        debug!(index = source, error = %err, "drag refused");
                        return;
                    }
                }
                _ => return,
            }
        }

        match target {
            Some(n) => {
                self.state.grid.hover(n);
                self.state.move_cursor_to(n);
            }
            None => self.state.grid.leave_hover(),
        }
    }

    fn mouse_up(&mut self, column: u16, row: u16) {
        let target = self.cell_under(column, row);
        let pressed = self.pointer.pressed.take();

        if self.state.grid.transfer_state().drag_source().is_some() {
            match target {
                Some(n) => {
                    let outcome = self.state.grid.drop_on(n);
                    self.apply_outcome(outcome);
                }
                None => {
                    self.state.grid.cancel_drag();
                }
            }
        } else if let Some(n) = pressed.filter(|n| Some(*n) == target) {
            if let Err(err) = self.state.grid.click(n) {
                debug!(index = n, error = %err, "edit refused");
            }
        }
    }

    // --- Rendering ---

    /// Renders the current state to the terminal frame.
    ///
    /// Degrades gracefully for small terminals:
    /// - Below minimum size: shows "Terminal too small" message
    /// - Between `MIN_HEIGHT` and `MIN_HEIGHT_WITH_HEADER`: hides header
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;

        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.header_visible = false;
            self.render_terminal_too_small(frame, area);
            return;
        }

        self.header_visible = area.height >= MIN_HEIGHT_WITH_HEADER;
        let areas = screen_areas(area, self.header_visible);

        if let Some(header) = areas.header {
            self.render_header(frame, header);
        }

        let cursor = self.state.cursor_index();
        let grid = &self.state.grid;
        let buf = frame.buffer_mut();
        render_card(grid, cursor, areas.card, buf);
        render_status_bar(grid, self.state.current_notice(), areas.status, buf);

        let transfer = grid.transfer_state();
        if let Some(pending) = transfer.pending() {
            render_confirm_dialog(pending, transfer.is_persisting(), area, buf);
        }

        if self.state.help_visible {
            render_help_overlay(area, buf);
        }
    }

    /// Renders a message indicating the terminal is too small.
    fn render_terminal_too_small(&self, frame: &mut Frame, area: Rect) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered_area = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        frame.render_widget(paragraph, centered_area);
    }

    /// Renders the header bar with title and help cue.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [title_area, help_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(17)]).areas(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "libcard",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled("Library Card", Style::default().fg(Color::White)),
        ]));
        frame.render_widget(title, title_area);

        let help_cue = Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" for help", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(help_cue, help_area);
    }

    /// Runs the main application loop.
    ///
    /// Refreshes the index once, then polls for events, applies background
    /// results, expires notices and renders until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libcard_config::CardConfig;
    /// use libcard_ledger::{InMemoryLedger, Reconciler};
    /// use libcard_protocol::dummy::dummy_transactions;
    /// use libcard_tui::{App, terminal};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut terminal = terminal::setup_terminal()?;
    ///     let reconciler = Reconciler::new(InMemoryLedger::new(dummy_transactions()));
    ///     let mut app = App::new(reconciler, &CardConfig::default());
    ///     app.run(&mut terminal).await?;
    ///     terminal::restore_terminal(&mut terminal)?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        self.spawn_refresh();

        loop {
            terminal.draw(|frame| self.view(frame))?;

            if let Some(event) = poll_event()? {
                let editing = self.state.grid.editing_index().is_some();
                if let Some(msg) = event_to_message(&event, editing) {
                    self.update(msg);
                }
            }

            self.drain_background();
            self.state.expire_notices(Instant::now());

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the orchestrator's snapshot plus
// local input state (login cursor, bid entry, confirmation prompts). The
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::auction::engine::{AuctionView, TeamView};
use crate::auction::history::HistoryEntry;
use crate::auction::roster::Player;
use crate::protocol::{AppSnapshot, LoginUser, Session, SessionRole, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated via `UiUpdate` messages from the orchestrator; input handling
/// mutates only the local fields (cursor, buffers, prompts).
#[derive(Debug, Clone)]
pub struct ViewState {
    pub league_name: String,
    pub session: Option<Session>,
    pub login_users: Vec<LoginUser>,
    pub passcode_required: bool,
    pub auction: Option<AuctionView>,
    pub teams: Vec<TeamView>,
    pub unassigned: Vec<Player>,
    pub history: Vec<HistoryEntry>,
    pub history_depth: usize,
    pub operator_finalize: bool,
    /// Last notice line from the orchestrator.
    pub notice: String,
    /// Login screen: index into `login_users`.
    pub login_cursor: usize,
    /// Login screen: passcode entry buffer.
    pub passcode_input: String,
    /// Leader bid entry buffer (digits only).
    pub bid_input: String,
    /// Reset confirmation prompt is showing.
    pub confirm_reset: bool,
    /// Scroll offset into the unassigned players panel.
    pub players_scroll: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            league_name: String::new(),
            session: None,
            login_users: Vec::new(),
            passcode_required: false,
            auction: None,
            teams: Vec::new(),
            unassigned: Vec::new(),
            history: Vec::new(),
            history_depth: 0,
            operator_finalize: true,
            notice: String::new(),
            login_cursor: 0,
            passcode_input: String::new(),
            bid_input: String::new(),
            confirm_reset: false,
            players_scroll: 0,
        }
    }
}

impl ViewState {
    /// Apply a full state snapshot from the orchestrator.
    ///
    /// Local input state survives except where it no longer makes sense:
    /// the bid buffer is dropped when no auction is open, and cursors are
    /// clamped to the new list lengths.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.league_name = snapshot.league_name;
        self.session = snapshot.session;
        self.login_users = snapshot.login_users;
        self.passcode_required = snapshot.passcode_required;
        self.auction = snapshot.auction;
        self.teams = snapshot.teams;
        self.unassigned = snapshot.unassigned;
        self.history = snapshot.history;
        self.history_depth = snapshot.history_depth;
        self.operator_finalize = snapshot.operator_finalize;

        if self.auction.is_none() {
            self.bid_input.clear();
        }
        if !self.login_users.is_empty() {
            self.login_cursor = self.login_cursor.min(self.login_users.len() - 1);
        } else {
            self.login_cursor = 0;
        }
        if !self.unassigned.is_empty() {
            self.players_scroll = self.players_scroll.min(self.unassigned.len() - 1);
        } else {
            self.players_scroll = 0;
        }
    }
}

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Notice(message) => {
            state.notice = message;
        }
    }
}

// ---------------------------------------------------------------------------
// Frame rendering
// ---------------------------------------------------------------------------

/// Render the complete frame: login screen before a session exists, the
/// dashboard afterwards.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    if state.session.is_none() {
        widgets::login::render(frame, frame.area(), state);
        return;
    }

    let layout = build_layout(frame.area());
    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::auction_banner::render(frame, layout.banner, state);
    widgets::players::render(frame, layout.players, state);
    widgets::teams::render(frame, layout.teams, state);
    widgets::history::render(frame, layout.history, state);
    render_notice_bar(frame, layout.notice_bar, state);
    render_help_bar(frame, layout.help_bar, state);
}

fn render_notice_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let (text, style) = if state.confirm_reset {
        (
            " reset everything? y/n".to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        (format!(" {}", state.notice), Style::default().fg(Color::Gray))
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style)));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let text = match state.session.as_ref().map(|s| s.role) {
        Some(SessionRole::Operator) => {
            if state.operator_finalize {
                " s:Start  Space:Pause  f:Hammer  u:Undo  R:Reset  Esc:Logout  q:Quit"
            } else {
                " s:Start  Space:Pause  u:Undo  R:Reset  Esc:Logout  q:Quit"
            }
        }
        Some(SessionRole::Leader(_)) => " 0-9:Amount  Enter:Bid  Esc:Logout  q:Quit",
        Some(SessionRole::Observer) | None => " Esc:Logout  q:Quit",
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal and installs a panic hook that restores it.
/// 2. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 3. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal even when rendering panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => break, // orchestrator gone
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events need no handling; the next
                        // render tick redraws at the new size.
                    }
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

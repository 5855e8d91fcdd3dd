// Application state and orchestration logic.
//
// The central event loop coordinates user commands from the TUI and ticks
// from the clock driver, dispatching both into the auction engine and
// pushing snapshots back to the render loop. Session identity lives here:
// the engine's API takes explicit team ids and stores no login state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::auction::engine::{AuctionEngine, AuctionRules, TickOutcome};
use crate::auction::history::HistoryEntry;
use crate::auction::ledger::Ledger;
use crate::auction::roster::{CatalogEntry, Roster};
use crate::clock::{ClockEvent, ClockHandle};
use crate::config::Config;
use crate::protocol::{
    AppSnapshot, LoginUser, Session, SessionRole, UiUpdate, UserCommand,
};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    config: Config,
    engine: AuctionEngine,
    session: Option<Session>,
}

/// Whether the event loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// Build the engine from a validated config.
pub fn build_engine(config: &Config) -> AuctionEngine {
    let catalog = config
        .players
        .iter()
        .map(|p| CatalogEntry {
            name: p.name.clone(),
            position: p.position.clone(),
            tier: p.tier.clone(),
            profile: p.profile.clone(),
            image: p.image.clone(),
        })
        .collect();
    let roster = Roster::new(catalog);
    let ledger = Ledger::new(&config.league.leaders, config.league.initial_budget);
    let rules = AuctionRules {
        auction_seconds: config.league.auction_seconds,
        operator_finalize: config.league.operator_finalize,
    };
    let rng = match config.league.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    AuctionEngine::new(roster, ledger, rules, rng)
}

impl AppState {
    pub fn new(config: Config, engine: AuctionEngine) -> Self {
        AppState {
            config,
            engine,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn engine(&self) -> &AuctionEngine {
        &self.engine
    }

    /// Tick delivery should run exactly while an auction is open and
    /// not paused.
    pub fn clock_should_run(&self) -> bool {
        self.engine
            .current_auction()
            .map(|a| !a.paused)
            .unwrap_or(false)
    }

    /// The entries offered on the login screen, in display order.
    pub fn login_users(&self) -> Vec<LoginUser> {
        let league = &self.config.league;
        let mut users = vec![LoginUser {
            name: league.operator.clone(),
            role: SessionRole::Operator,
        }];
        for leader in &league.leaders {
            if let Some(team) = self.engine.ledger().resolve(leader) {
                users.push(LoginUser {
                    name: leader.clone(),
                    role: SessionRole::Leader(team),
                });
            }
        }
        for observer in &league.observers {
            users.push(LoginUser {
                name: observer.clone(),
                role: SessionRole::Observer,
            });
        }
        users
    }

    // -- command handling ---------------------------------------------------

    /// Process one user command. Returns whether to keep running and an
    /// optional notice for the UI.
    pub fn handle_command(&mut self, cmd: UserCommand) -> (CommandOutcome, Option<String>) {
        match cmd {
            UserCommand::Quit => (CommandOutcome::Quit, None),
            UserCommand::Login { user, passcode } => {
                (CommandOutcome::Continue, Some(self.handle_login(user, passcode)))
            }
            UserCommand::Logout => {
                if let Some(session) = self.session.take() {
                    info!("{} logged out", session.user);
                }
                (CommandOutcome::Continue, None)
            }
            other => (CommandOutcome::Continue, self.handle_session_command(other)),
        }
    }

    fn handle_login(&mut self, user: String, passcode: Option<String>) -> String {
        let Some(login) = self.login_users().into_iter().find(|u| u.name == user) else {
            warn!("login rejected: unknown user {user}");
            return format!("unknown user: {user}");
        };

        // Observers walk in; everyone else needs the league passcode when
        // one is configured.
        if login.role != SessionRole::Observer {
            if let Some(expected) = &self.config.league.passcode {
                if passcode.as_deref() != Some(expected.as_str()) {
                    warn!("login rejected for {user}: wrong passcode");
                    return "wrong passcode".to_string();
                }
            }
        }

        info!("{user} logged in as {:?}", login.role);
        self.session = Some(Session {
            user: login.name,
            role: login.role,
        });
        format!("welcome, {user}")
    }

    fn handle_session_command(&mut self, cmd: UserCommand) -> Option<String> {
        let Some(session) = self.session.clone() else {
            return Some("log in first".to_string());
        };

        match (session.role, cmd) {
            (SessionRole::Operator, UserCommand::StartAuction) => {
                match self.engine.start_auction() {
                    Ok(state) => {
                        let name = self
                            .engine
                            .roster()
                            .get(state.player)
                            .map(|p| p.name.clone())
                            .unwrap_or_default();
                        Some(format!("auction opened: {name}"))
                    }
                    Err(err) => Some(err.to_string()),
                }
            }
            (SessionRole::Operator, UserCommand::TogglePause) => {
                match self.engine.current_auction() {
                    None => Some("no auction to pause".to_string()),
                    Some(active) if active.paused => {
                        self.engine.resume();
                        Some("auction resumed".to_string())
                    }
                    Some(_) => {
                        self.engine.pause();
                        Some("auction paused".to_string())
                    }
                }
            }
            (SessionRole::Operator, UserCommand::Finalize) => match self.engine.finalize() {
                Ok(entry) => Some(self.sale_notice(&entry)),
                Err(err) => Some(err.to_string()),
            },
            (SessionRole::Operator, UserCommand::Undo) => match self.engine.undo() {
                Ok(entry) => Some(format!(
                    "undid sale: {} back in the pool",
                    entry.player_name
                )),
                Err(err) => Some(err.to_string()),
            },
            (SessionRole::Operator, UserCommand::ResetAll) => {
                self.engine.reset_all();
                Some("session reset".to_string())
            }
            (SessionRole::Operator, UserCommand::EditProfile { player, update }) => {
                match self.engine.update_profile(player, update) {
                    Ok(()) => Some("profile updated".to_string()),
                    Err(err) => Some(err.to_string()),
                }
            }
            (SessionRole::Leader(team), UserCommand::Bid { amount }) => {
                match self.engine.bid(team, amount) {
                    Ok(()) => Some(format!("bid {amount} by {}", session.user)),
                    Err(err) => Some(err.to_string()),
                }
            }
            (_, UserCommand::Bid { .. }) => {
                Some("only a team leader can bid".to_string())
            }
            (_, _) => Some("only the operator can do that".to_string()),
        }
    }

    /// Process one clock tick. Returns a notice when the auction settled.
    pub fn handle_tick(&mut self) -> Option<String> {
        match self.engine.tick() {
            TickOutcome::Ignored | TickOutcome::Counting { .. } => None,
            TickOutcome::Sold(entry) => Some(self.sale_notice(&entry)),
            TickOutcome::Passed(player) => {
                let name = self
                    .engine
                    .roster()
                    .get(player)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                Some(format!("no bids: {name} returns to the pool"))
            }
        }
    }

    fn sale_notice(&self, entry: &HistoryEntry) -> String {
        let leader = self
            .engine
            .ledger()
            .leader(entry.bidder)
            .unwrap_or("unknown")
            .to_string();
        format!("sold: {} to {leader} for {}", entry.player_name, entry.amount)
    }

    // -- snapshots ----------------------------------------------------------

    /// Capture the full view state for the TUI in one shot.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            league_name: self.config.league.name.clone(),
            session: self.session.clone(),
            login_users: self.login_users(),
            passcode_required: self.config.league.passcode.is_some(),
            auction: self.engine.auction_view(),
            teams: self.engine.team_views(),
            unassigned: self.engine.unassigned_players(),
            history: self.engine.history().entries().to_vec(),
            history_depth: self.engine.history_depth(),
            operator_finalize: self.engine.rules().operator_finalize,
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator loop until the user quits or the TUI goes away.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut clock_rx: mpsc::Receiver<ClockEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    clock: ClockHandle,
    mut state: AppState,
) -> anyhow::Result<()> {
    // Seed the TUI with the initial view.
    push_snapshot(&ui_tx, &state).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    // TUI dropped its sender: shut down.
                    break;
                };
                let (outcome, notice) = state.handle_command(cmd);
                if let Some(msg) = notice {
                    let _ = ui_tx.send(UiUpdate::Notice(msg)).await;
                }
                clock.set_running(state.clock_should_run());
                push_snapshot(&ui_tx, &state).await;
                if outcome == CommandOutcome::Quit {
                    break;
                }
            }

            tick = clock_rx.recv() => {
                let Some(ClockEvent::Tick) = tick else {
                    break;
                };
                if let Some(msg) = state.handle_tick() {
                    let _ = ui_tx.send(UiUpdate::Notice(msg)).await;
                }
                clock.set_running(state.clock_should_run());
                push_snapshot(&ui_tx, &state).await;
            }
        }
    }

    clock.abort();
    info!("orchestrator loop stopped");
    Ok(())
}

async fn push_snapshot(ui_tx: &mpsc::Sender<UiUpdate>, state: &AppState) {
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;
}

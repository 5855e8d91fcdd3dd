// Integration tests for the auction board.
//
// These tests exercise the system end-to-end through the library crate's
// public API: the engine scenarios (start, bid, countdown, settlement,
// undo, reset), the app layer's session handling and authorization, and
// the full task topology with a paused-time clock.

use std::time::Duration;

use auction_board::app::{self, AppState, CommandOutcome};
use auction_board::auction::engine::{AuctionEngine, TickOutcome};
use auction_board::auction::{AuctionError, TeamId};
use auction_board::clock;
use auction_board::config::{Config, LeagueConfig, PlayerEntry};
use auction_board::protocol::{UiUpdate, UserCommand};

use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

const BUDGET: u32 = 3000;
const SECONDS: u32 = 20;

/// Build a test-ready Config with inline settings (no files). The rng seed
/// is pinned so player selection is reproducible.
fn inline_config(num_players: usize) -> Config {
    Config {
        league: LeagueConfig {
            name: "Test Integration League".into(),
            operator: "Commissioner".into(),
            leaders: vec!["Kang".into(), "Yoon".into(), "Kim".into(), "Park".into()],
            observers: vec!["Guest".into()],
            initial_budget: BUDGET,
            auction_seconds: SECONDS,
            operator_finalize: true,
            passcode: Some("8751".into()),
            rng_seed: Some(7),
        },
        players: (1..=num_players)
            .map(|i| PlayerEntry {
                name: format!("player {i}"),
                position: "Mid".into(),
                tier: "A".into(),
                profile: String::new(),
                image: String::new(),
            })
            .collect(),
    }
}

fn new_engine(num_players: usize) -> AuctionEngine {
    app::build_engine(&inline_config(num_players))
}

fn new_app(num_players: usize) -> AppState {
    let config = inline_config(num_players);
    let engine = app::build_engine(&config);
    AppState::new(config, engine)
}

fn login(state: &mut AppState, user: &str) {
    let (outcome, notice) = state.handle_command(UserCommand::Login {
        user: user.into(),
        passcode: Some("8751".into()),
    });
    assert_eq!(outcome, CommandOutcome::Continue);
    assert_eq!(notice.unwrap(), format!("welcome, {user}"));
}

/// The conservation identity over the whole session.
fn assert_conservation(engine: &AuctionEngine) {
    let assigned: u32 = engine
        .roster()
        .players()
        .iter()
        .filter(|p| p.owner.is_some())
        .map(|p| p.price)
        .sum();
    let expected = engine.ledger().num_teams() as u32 * BUDGET;
    assert_eq!(engine.ledger().total_remaining() + assigned, expected);
    assert_eq!(engine.history_depth(), engine.roster().assigned_count());
}

// ===========================================================================
// Engine scenarios
// ===========================================================================

// Scenario A: 4 teams, budget 3000 each; one bid of 500, then a quiet
// 20-second window settles the sale automatically.
#[test]
fn quiet_window_settles_the_sale_to_the_standing_bidder() {
    let mut engine = new_engine(20);
    let opened = engine.start_auction().unwrap();
    engine.bid(TeamId(0), 500).unwrap();

    let mut outcome = TickOutcome::Ignored;
    for _ in 0..SECONDS {
        outcome = engine.tick();
    }

    let TickOutcome::Sold(entry) = outcome else {
        panic!("expected a sale, got {outcome:?}");
    };
    assert_eq!(entry.player, opened.player);
    assert_eq!(entry.bidder, TeamId(0));
    assert_eq!(entry.amount, 500);

    let player = engine.roster().get(opened.player).unwrap();
    assert_eq!(player.owner, Some(TeamId(0)));
    assert_eq!(player.price, 500);
    assert_eq!(engine.ledger().remaining(TeamId(0)).unwrap(), 2500);
    assert_conservation(&engine);
}

// Scenario B: undo after the sale restores the pre-sale world.
#[test]
fn undo_restores_player_budget_and_history() {
    let mut engine = new_engine(20);
    let opened = engine.start_auction().unwrap();
    engine.bid(TeamId(0), 500).unwrap();
    for _ in 0..SECONDS {
        engine.tick();
    }
    assert_eq!(engine.history_depth(), 1);

    engine.undo().unwrap();

    let player = engine.roster().get(opened.player).unwrap();
    assert!(player.owner.is_none());
    assert_eq!(player.price, 0);
    assert_eq!(engine.ledger().remaining(TeamId(0)).unwrap(), BUDGET);
    assert_eq!(engine.history_depth(), 0);
    assert_conservation(&engine);
}

// Scenario C: zero and over-budget bids are rejected without touching
// the standing bid.
#[test]
fn invalid_bids_leave_the_auction_untouched() {
    let mut engine = new_engine(20);
    engine.start_auction().unwrap();

    assert_eq!(
        engine.bid(TeamId(0), 0).unwrap_err(),
        AuctionError::InvalidBidAmount
    );
    assert_eq!(
        engine.bid(TeamId(0), 5000).unwrap_err(),
        AuctionError::InsufficientBudget {
            bid: 5000,
            remaining: BUDGET
        }
    );

    let active = engine.current_auction().unwrap();
    assert_eq!(active.current_bid, 0);
    assert!(active.highest_bidder.is_none());
    assert_eq!(active.seconds_remaining, SECONDS);
}

// Scenario D: starting with every player assigned fails.
#[test]
fn start_fails_once_every_player_is_assigned() {
    let mut engine = new_engine(3);
    for i in 0..3u32 {
        engine.start_auction().unwrap();
        engine.bid(TeamId(i % 4), 100).unwrap();
        engine.finalize().unwrap();
    }
    assert_eq!(engine.roster().assigned_count(), 3);
    assert_eq!(
        engine.start_auction().unwrap_err(),
        AuctionError::NoPlayersAvailable
    );
}

// Scenario E: undo with empty history fails and changes nothing.
#[test]
fn undo_with_empty_history_changes_nothing() {
    let mut engine = new_engine(20);
    let before_remaining = engine.ledger().total_remaining();

    assert_eq!(engine.undo().unwrap_err(), AuctionError::NothingToUndo);

    assert_eq!(engine.ledger().total_remaining(), before_remaining);
    assert_eq!(engine.roster().assigned_count(), 0);
    assert_conservation(&engine);
}

// The round-trip law: finalize followed by undo restores roster, ledger,
// and history to their exact pre-finalize values.
#[test]
fn finalize_then_undo_is_an_exact_round_trip() {
    let mut engine = new_engine(20);

    // Put some prior history in place so the round trip runs mid-session.
    engine.start_auction().unwrap();
    engine.bid(TeamId(2), 750).unwrap();
    engine.finalize().unwrap();

    engine.start_auction().unwrap();
    engine.bid(TeamId(1), 425).unwrap();

    let players_before = engine.roster().players().to_vec();
    let ledger_before = engine.ledger().entries().to_vec();
    let history_before = engine.history().entries().to_vec();

    engine.finalize().unwrap();
    engine.undo().unwrap();

    assert_eq!(engine.roster().players(), players_before.as_slice());
    assert_eq!(engine.ledger().entries(), ledger_before.as_slice());
    assert_eq!(engine.history().entries(), history_before.as_slice());
}

#[test]
fn every_accepted_bid_restarts_the_countdown() {
    let mut engine = new_engine(20);
    engine.start_auction().unwrap();

    for (i, amount) in [100u32, 250, 90, 3000].into_iter().enumerate() {
        for _ in 0..5 {
            engine.tick();
        }
        let team = TeamId((i % 4) as u32);
        engine.bid(team, amount).unwrap();
        let active = engine.current_auction().unwrap();
        assert_eq!(active.seconds_remaining, SECONDS);
        assert_eq!(active.highest_bidder, Some(team));
        assert_eq!(active.current_bid, amount);
    }
}

#[test]
fn conservation_holds_across_a_mixed_session() {
    let mut engine = new_engine(20);

    for round in 0..6u32 {
        engine.start_auction().unwrap();
        assert_conservation(&engine);

        if round % 3 == 0 {
            // Let this one pass with no bids.
            for _ in 0..SECONDS {
                engine.tick();
            }
        } else {
            engine.bid(TeamId(round % 4), 150 * round).unwrap();
            engine.pause();
            assert_eq!(engine.tick(), TickOutcome::Ignored);
            engine.resume();
            for _ in 0..SECONDS {
                engine.tick();
            }
        }
        assert_conservation(&engine);
    }

    while engine.history_depth() > 0 {
        engine.undo().unwrap();
        assert_conservation(&engine);
    }

    engine.reset_all();
    assert_conservation(&engine);
}

// ===========================================================================
// App-layer scenarios
// ===========================================================================

#[test]
fn full_session_through_the_command_interface() {
    let mut state = new_app(20);

    // Operator opens the floor.
    login(&mut state, "Commissioner");
    let (_, notice) = state.handle_command(UserCommand::StartAuction);
    assert!(notice.unwrap().starts_with("auction opened:"));
    state.handle_command(UserCommand::Logout);

    // A leader takes the bid.
    login(&mut state, "Kang");
    let (_, notice) = state.handle_command(UserCommand::Bid { amount: 500 });
    assert_eq!(notice.unwrap(), "bid 500 by Kang");

    // The quiet window runs out.
    let mut sold = None;
    for _ in 0..SECONDS {
        if let Some(notice) = state.handle_tick() {
            sold = Some(notice);
        }
    }
    let sold = sold.unwrap();
    assert!(sold.starts_with("sold:"), "unexpected notice: {sold}");
    assert!(sold.contains("Kang"));

    let snapshot = state.build_snapshot();
    assert_eq!(snapshot.history_depth, 1);
    assert_eq!(snapshot.unassigned.len(), 19);
    let kang = snapshot
        .teams
        .iter()
        .find(|t| t.leader == "Kang")
        .unwrap();
    assert_eq!(kang.remaining, 2500);
    assert_eq!(kang.players.len(), 1);

    // Back to the operator for the undo.
    state.handle_command(UserCommand::Logout);
    login(&mut state, "Commissioner");
    let (_, notice) = state.handle_command(UserCommand::Undo);
    assert!(notice.unwrap().starts_with("undid sale:"));

    let snapshot = state.build_snapshot();
    assert_eq!(snapshot.history_depth, 0);
    assert_eq!(snapshot.unassigned.len(), 20);
}

#[test]
fn authorization_matrix_is_enforced() {
    let mut state = new_app(20);

    // Leaders cannot drive the auction lifecycle.
    login(&mut state, "Yoon");
    for cmd in [
        UserCommand::StartAuction,
        UserCommand::TogglePause,
        UserCommand::Finalize,
        UserCommand::Undo,
        UserCommand::ResetAll,
    ] {
        let (_, notice) = state.handle_command(cmd);
        assert_eq!(notice.unwrap(), "only the operator can do that");
    }
    assert!(state.engine().current_auction().is_none());

    // Observers cannot bid.
    state.handle_command(UserCommand::Logout);
    login(&mut state, "Guest");
    let (_, notice) = state.handle_command(UserCommand::Bid { amount: 10 });
    assert_eq!(notice.unwrap(), "only a team leader can bid");
}

#[test]
fn reset_all_clears_a_live_session() {
    let mut state = new_app(20);
    login(&mut state, "Commissioner");
    state.handle_command(UserCommand::StartAuction);
    state.handle_command(UserCommand::Logout);
    login(&mut state, "Park");
    state.handle_command(UserCommand::Bid { amount: 900 });
    state.handle_command(UserCommand::Logout);
    login(&mut state, "Commissioner");
    state.handle_command(UserCommand::Finalize);
    assert_eq!(state.engine().history_depth(), 1);

    let (_, notice) = state.handle_command(UserCommand::ResetAll);
    assert_eq!(notice.unwrap(), "session reset");

    let snapshot = state.build_snapshot();
    assert!(snapshot.auction.is_none());
    assert_eq!(snapshot.history_depth, 0);
    assert_eq!(snapshot.unassigned.len(), 20);
    assert!(snapshot.teams.iter().all(|t| t.remaining == BUDGET));
}

// ===========================================================================
// Full task topology with a paused-time clock
// ===========================================================================

/// Drain all pending UI updates, returning the notices seen.
fn drain_notices(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> Vec<String> {
    let mut notices = Vec::new();
    while let Ok(update) = ui_rx.try_recv() {
        if let UiUpdate::Notice(msg) = update {
            notices.push(msg);
        }
    }
    notices
}

#[tokio::test(start_paused = true)]
async fn clock_driven_settlement_through_the_event_loop() {
    let state = new_app(20);

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (clock_tx, clock_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    let clock_handle = clock::spawn(Duration::from_secs(1), clock_tx);
    let app_task = tokio::spawn(app::run(cmd_rx, clock_rx, ui_tx, clock_handle, state));

    let settle = || async {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    };

    // Operator opens the floor.
    cmd_tx
        .send(UserCommand::Login {
            user: "Commissioner".into(),
            passcode: Some("8751".into()),
        })
        .await
        .unwrap();
    cmd_tx.send(UserCommand::StartAuction).await.unwrap();
    settle().await;

    // Hand the session to a leader who bids 500.
    cmd_tx.send(UserCommand::Logout).await.unwrap();
    cmd_tx
        .send(UserCommand::Login {
            user: "Kang".into(),
            passcode: Some("8751".into()),
        })
        .await
        .unwrap();
    cmd_tx.send(UserCommand::Bid { amount: 500 }).await.unwrap();
    settle().await;
    drain_notices(&mut ui_rx);

    // A quiet 20 seconds on the wall clock settles the sale.
    for _ in 0..20 {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }

    let notices = drain_notices(&mut ui_rx);
    assert!(
        notices.iter().any(|n| n.starts_with("sold:") && n.contains("Kang")),
        "no sale notice in {notices:?}"
    );

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    settle().await;
    app_task.await.unwrap().unwrap();
}

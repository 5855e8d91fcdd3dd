// Auction engine: the state machine that runs one auction at a time.
//
// Owns the roster, ledger, and history; every mutation of those stores flows
// through the commit/undo sequences here. Operations are serialized through
// `&mut self`, so a bid that arrives after the countdown reached zero is
// processed after the timeout settlement and rejected with `NoActiveAuction`.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::history::{HistoryEntry, HistoryLog};
use super::ledger::Ledger;
use super::roster::{Player, ProfileUpdate, Roster};
use super::{AuctionError, PlayerId, TeamId};

// ---------------------------------------------------------------------------
// Rules and state
// ---------------------------------------------------------------------------

/// League rules the engine enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRules {
    /// Countdown length in seconds. Every accepted bid restarts it.
    pub auction_seconds: u32,
    /// Whether the operator may settle early while a bid stands. The
    /// timeout settlement is always active regardless.
    pub operator_finalize: bool,
}

/// The single in-flight auction. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub player: PlayerId,
    pub current_bid: u32,
    pub highest_bidder: Option<TeamId>,
    pub seconds_remaining: u32,
    /// While paused the countdown is frozen; bids are still accepted.
    pub paused: bool,
}

/// What a single clock tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No auction open, or the auction is paused.
    Ignored,
    /// The countdown advanced and the auction is still open.
    Counting { seconds_remaining: u32 },
    /// The countdown hit zero with a standing bid: the sale committed.
    Sold(HistoryEntry),
    /// The countdown hit zero with no bids: the player returned to the pool.
    Passed(PlayerId),
}

// ---------------------------------------------------------------------------
// View types for the query surface
// ---------------------------------------------------------------------------

/// Snapshot of the in-flight auction for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionView {
    pub player: Player,
    pub current_bid: u32,
    pub highest_bidder: Option<TeamId>,
    pub bidder_name: Option<String>,
    pub seconds_remaining: u32,
    pub paused: bool,
}

/// Snapshot of one team's budget and roster for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    pub team: TeamId,
    pub leader: String,
    pub remaining: u32,
    pub spent: u32,
    pub players: Vec<Player>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct AuctionEngine {
    roster: Roster,
    ledger: Ledger,
    history: HistoryLog,
    rules: AuctionRules,
    active: Option<AuctionState>,
    rng: StdRng,
}

impl AuctionEngine {
    pub fn new(roster: Roster, ledger: Ledger, rules: AuctionRules, rng: StdRng) -> Self {
        AuctionEngine {
            roster,
            ledger,
            history: HistoryLog::new(),
            rules,
            active: None,
            rng,
        }
    }

    // -- commands -----------------------------------------------------------

    /// Open an auction for one unassigned player chosen uniformly at random.
    pub fn start_auction(&mut self) -> Result<AuctionState, AuctionError> {
        if self.active.is_some() {
            return Err(AuctionError::AuctionAlreadyOpen);
        }
        let pool = self.roster.unassigned_ids();
        if pool.is_empty() {
            return Err(AuctionError::NoPlayersAvailable);
        }

        let player = pool[self.rng.gen_range(0..pool.len())];
        let name = self.roster.get(player)?.name.clone();
        let state = AuctionState {
            player,
            current_bid: 0,
            highest_bidder: None,
            seconds_remaining: self.rules.auction_seconds,
            paused: false,
        };
        self.active = Some(state.clone());

        info!(
            "auction opened: {name} (player {player}), {}s on the clock",
            state.seconds_remaining
        );
        Ok(state)
    }

    /// Freeze the countdown. No-op outside an active auction.
    pub fn pause(&mut self) {
        if let Some(active) = self.active.as_mut() {
            if !active.paused {
                active.paused = true;
                debug!("auction paused at {}s", active.seconds_remaining);
            }
        }
    }

    /// Unfreeze the countdown. No-op outside an active auction.
    pub fn resume(&mut self) {
        if let Some(active) = self.active.as_mut() {
            if active.paused {
                active.paused = false;
                debug!("auction resumed at {}s", active.seconds_remaining);
            }
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Only meaningful while an auction is open and not paused. When the
    /// countdown reaches zero the auction settles in the same call: a
    /// standing bid becomes a binding sale, no bid returns the player to
    /// the unassigned pool.
    pub fn tick(&mut self) -> TickOutcome {
        let (seconds, has_bidder, player) = match self.active.as_mut() {
            None => return TickOutcome::Ignored,
            Some(active) if active.paused => return TickOutcome::Ignored,
            Some(active) => {
                active.seconds_remaining = active.seconds_remaining.saturating_sub(1);
                (
                    active.seconds_remaining,
                    active.highest_bidder.is_some(),
                    active.player,
                )
            }
        };

        if seconds > 0 {
            return TickOutcome::Counting {
                seconds_remaining: seconds,
            };
        }

        if has_bidder {
            match self.commit_sale() {
                Ok(entry) => TickOutcome::Sold(entry),
                Err(err) => {
                    // Unreachable with validated bids; keep the auction open
                    // rather than half-apply anything.
                    warn!("timeout settlement failed: {err}");
                    TickOutcome::Ignored
                }
            }
        } else {
            self.active = None;
            info!("auction passed with no bids, player {player} returns to the pool");
            TickOutcome::Passed(player)
        }
    }

    /// Register a bid and restart the countdown.
    ///
    /// Bids are accepted while paused; only the clock is frozen. Rejected
    /// bids leave every field untouched.
    pub fn bid(&mut self, team: TeamId, amount: u32) -> Result<(), AuctionError> {
        if self.active.is_none() {
            return Err(AuctionError::NoActiveAuction);
        }
        let remaining = self.ledger.remaining(team)?;
        if amount == 0 {
            return Err(AuctionError::InvalidBidAmount);
        }
        if amount > remaining {
            return Err(AuctionError::InsufficientBudget {
                bid: amount,
                remaining,
            });
        }

        let active = self
            .active
            .as_mut()
            .ok_or(AuctionError::NoActiveAuction)?;
        active.current_bid = amount;
        active.highest_bidder = Some(team);
        active.seconds_remaining = self.rules.auction_seconds;
        debug!("bid accepted: {amount} by team {team}, clock reset");
        Ok(())
    }

    /// Settle the open auction early by operator action.
    ///
    /// Only available when the league rules allow it; the timeout path in
    /// [`tick`](Self::tick) does not go through this check.
    pub fn finalize(&mut self) -> Result<HistoryEntry, AuctionError> {
        let active = self.active.as_ref().ok_or(AuctionError::NoActiveAuction)?;
        if !self.rules.operator_finalize {
            return Err(AuctionError::FinalizeNotAllowed);
        }
        if active.highest_bidder.is_none() {
            return Err(AuctionError::NoStandingBid);
        }
        self.commit_sale()
    }

    /// Reverse the most recently finalized auction.
    ///
    /// Applies the exact inverse of the commit: owner cleared, price zeroed,
    /// budget credited, acquired entry removed, history popped. Works
    /// whether or not an auction is currently open.
    pub fn undo(&mut self) -> Result<HistoryEntry, AuctionError> {
        let last = self
            .history
            .peek_last()
            .ok_or(AuctionError::NothingToUndo)?
            .clone();

        // Validate the inverse before mutating anything.
        self.roster.get(last.player)?;
        self.ledger.remaining(last.bidder)?;

        self.roster.clear_assignment(last.player)?;
        self.ledger.credit(last.bidder, last.amount)?;
        self.ledger.remove_player(last.bidder, last.player)?;
        let entry = self.history.pop_last()?;

        info!(
            "undid sale: {} back to the pool, {} refunded to team {}",
            entry.player_name, entry.amount, entry.bidder
        );
        Ok(entry)
    }

    /// Restore roster, ledger, history, and auction state to their
    /// initialized values. Confirmation is the caller's responsibility.
    pub fn reset_all(&mut self) {
        self.roster.reset();
        self.ledger.reset();
        self.history.clear();
        self.active = None;
        info!("session reset to initial state");
    }

    /// Edit a player's profile metadata. Never touches price or ownership.
    pub fn update_profile(
        &mut self,
        player: PlayerId,
        update: ProfileUpdate,
    ) -> Result<(), AuctionError> {
        self.roster.update_profile(player, update)
    }

    // -- the atomic commit --------------------------------------------------

    /// Commit the open auction's outcome in one atomic step.
    ///
    /// Validates every precondition up front; the mutations below cannot
    /// fail after that, so no partial effect is ever observable.
    fn commit_sale(&mut self) -> Result<HistoryEntry, AuctionError> {
        let active = self.active.as_ref().ok_or(AuctionError::NoActiveAuction)?;
        let bidder = active.highest_bidder.ok_or(AuctionError::NoStandingBid)?;
        let amount = active.current_bid;
        let player = active.player;
        let player_name = self.roster.get(player)?.name.clone();
        let leader = self.ledger.leader(bidder)?.to_string();
        let remaining = self.ledger.remaining(bidder)?;
        if amount > remaining {
            return Err(AuctionError::InsufficientBudget {
                bid: amount,
                remaining,
            });
        }

        self.roster.apply_assignment(player, bidder, amount)?;
        self.ledger.debit(bidder, amount)?;
        self.ledger.add_player(bidder, player)?;
        let entry = HistoryEntry {
            player,
            player_name,
            bidder,
            amount,
            closed_at: Utc::now(),
        };
        self.history.push(entry.clone());
        self.active = None;

        info!("sold: {} to {leader} for {amount}", entry.player_name);
        Ok(entry)
    }

    // -- queries ------------------------------------------------------------

    pub fn current_auction(&self) -> Option<&AuctionState> {
        self.active.as_ref()
    }

    pub fn auction_view(&self) -> Option<AuctionView> {
        let active = self.active.as_ref()?;
        let player = self.roster.get(active.player).ok()?.clone();
        let bidder_name = active
            .highest_bidder
            .and_then(|team| self.ledger.leader(team).ok())
            .map(str::to_string);
        Some(AuctionView {
            player,
            current_bid: active.current_bid,
            highest_bidder: active.highest_bidder,
            bidder_name,
            seconds_remaining: active.seconds_remaining,
            paused: active.paused,
        })
    }

    pub fn team_view(&self, team: TeamId) -> Result<TeamView, AuctionError> {
        let leader = self.ledger.leader(team)?.to_string();
        let remaining = self.ledger.remaining(team)?;
        let players = self
            .ledger
            .acquired_players(team)?
            .iter()
            .filter_map(|&id| self.roster.get(id).ok())
            .cloned()
            .collect();
        Ok(TeamView {
            team,
            leader,
            remaining,
            spent: self.ledger.initial_budget() - remaining,
            players,
        })
    }

    pub fn team_views(&self) -> Vec<TeamView> {
        self.ledger
            .team_ids()
            .into_iter()
            .filter_map(|team| self.team_view(team).ok())
            .collect()
    }

    pub fn unassigned_players(&self) -> Vec<Player> {
        self.roster.unassigned().cloned().collect()
    }

    pub fn history_depth(&self) -> usize {
        self.history.depth()
    }

    pub fn rules(&self) -> &AuctionRules {
        &self.rules
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }
}

// Budget ledger: per-team remaining funds and acquired-player lists.
//
// Mutated only by the engine's commit/undo sequences. `debit` refuses to
// drive a balance negative; the engine validates bids against `remaining`
// before committing, so the guard should never fire in practice.

use serde::{Deserialize, Serialize};

use super::{AuctionError, PlayerId, TeamId};

/// Funds and acquisitions of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub team: TeamId,
    /// Display name of the team leader.
    pub leader: String,
    /// Remaining funds. Always `initial_budget - sum(price of acquired)`.
    pub remaining: u32,
    /// Acquired players in purchase order.
    pub acquired: Vec<PlayerId>,
}

/// The full set of team budgets, fixed at process start.
#[derive(Debug, Clone)]
pub struct Ledger {
    initial_budget: u32,
    entries: Vec<BudgetEntry>,
}

impl Ledger {
    /// Create one entry per leader, each starting at the full budget.
    pub fn new(leaders: &[String], initial_budget: u32) -> Self {
        let entries = leaders
            .iter()
            .enumerate()
            .map(|(i, leader)| BudgetEntry {
                team: TeamId(i as u32),
                leader: leader.clone(),
                remaining: initial_budget,
                acquired: Vec::new(),
            })
            .collect();
        Ledger {
            initial_budget,
            entries,
        }
    }

    pub fn initial_budget(&self) -> u32 {
        self.initial_budget
    }

    pub fn num_teams(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.entries.iter().map(|e| e.team).collect()
    }

    /// Resolve a leader's display name to their team id.
    pub fn resolve(&self, leader: &str) -> Option<TeamId> {
        self.entries
            .iter()
            .find(|e| e.leader == leader)
            .map(|e| e.team)
    }

    fn entry(&self, team: TeamId) -> Result<&BudgetEntry, AuctionError> {
        self.entries
            .get(team.0 as usize)
            .ok_or(AuctionError::UnknownTeam(team))
    }

    fn entry_mut(&mut self, team: TeamId) -> Result<&mut BudgetEntry, AuctionError> {
        self.entries
            .get_mut(team.0 as usize)
            .ok_or(AuctionError::UnknownTeam(team))
    }

    pub fn leader(&self, team: TeamId) -> Result<&str, AuctionError> {
        Ok(&self.entry(team)?.leader)
    }

    pub fn remaining(&self, team: TeamId) -> Result<u32, AuctionError> {
        Ok(self.entry(team)?.remaining)
    }

    pub fn acquired_players(&self, team: TeamId) -> Result<&[PlayerId], AuctionError> {
        Ok(&self.entry(team)?.acquired)
    }

    /// Add funds back to a team (undo path).
    pub fn credit(&mut self, team: TeamId, amount: u32) -> Result<(), AuctionError> {
        let entry = self.entry_mut(team)?;
        entry.remaining += amount;
        Ok(())
    }

    /// Take funds from a team. Fails rather than going negative.
    pub fn debit(&mut self, team: TeamId, amount: u32) -> Result<(), AuctionError> {
        let entry = self.entry_mut(team)?;
        if amount > entry.remaining {
            return Err(AuctionError::InsufficientBudget {
                bid: amount,
                remaining: entry.remaining,
            });
        }
        entry.remaining -= amount;
        Ok(())
    }

    /// Append a player to a team's acquired list.
    pub fn add_player(&mut self, team: TeamId, player: PlayerId) -> Result<(), AuctionError> {
        self.entry_mut(team)?.acquired.push(player);
        Ok(())
    }

    /// Remove a player from a team's acquired list (undo path).
    pub fn remove_player(&mut self, team: TeamId, player: PlayerId) -> Result<(), AuctionError> {
        self.entry_mut(team)?.acquired.retain(|&id| id != player);
        Ok(())
    }

    /// Funds remaining across all teams.
    pub fn total_remaining(&self) -> u32 {
        self.entries.iter().map(|e| e.remaining).sum()
    }

    /// Restore every team to the full budget with no acquisitions.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.remaining = self.initial_budget;
            entry.acquired.clear();
        }
    }
}

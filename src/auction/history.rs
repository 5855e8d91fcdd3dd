// History log: the record of finalized auctions, enabling one-step undo.
//
// A stack, not a general ledger: entries append on finalize and only the
// most recent entry can be popped. There is no redo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuctionError, PlayerId, TeamId};

/// One finalized auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub player: PlayerId,
    /// Name snapshot taken at settlement, so the log stays readable even
    /// after later profile edits.
    pub player_name: String,
    pub bidder: TeamId,
    pub amount: u32,
    pub closed_at: DateTime<Utc>,
}

/// Append-only record of finalized auctions.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        HistoryLog::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Remove and return the most recent entry.
    pub fn pop_last(&mut self) -> Result<HistoryEntry, AuctionError> {
        self.entries.pop().ok_or(AuctionError::NothingToUndo)
    }

    pub fn peek_last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

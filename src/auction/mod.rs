// Auction domain: roster store, budget ledger, history log, and the engine
// that coordinates them.

pub mod engine;
pub mod history;
pub mod ledger;
pub mod roster;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of a player in the catalog.
///
/// Assigned sequentially (1-indexed) in catalog order at startup and never
/// reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a team leader in the fixed set defined at process start.
///
/// Indexes the ledger's entries; the set never changes for the lifetime of
/// the session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong inside the auction domain.
///
/// Validation errors (`InvalidBidAmount`, `InsufficientBudget`) and state
/// errors (`NoPlayersAvailable`, `AuctionAlreadyOpen`, `NoActiveAuction`,
/// `NoStandingBid`, `FinalizeNotAllowed`, `NothingToUndo`) are recoverable
/// and leave all stores untouched. `UnknownPlayer`/`UnknownTeam` indicate a
/// caller passed an id outside the fixed sets; they should not occur with a
/// well-formed UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("bid amount must be greater than zero")]
    InvalidBidAmount,

    #[error("bid of {bid} exceeds remaining budget of {remaining}")]
    InsufficientBudget { bid: u32, remaining: u32 },

    #[error("no unassigned players left to auction")]
    NoPlayersAvailable,

    #[error("an auction is already open")]
    AuctionAlreadyOpen,

    #[error("no auction is currently open")]
    NoActiveAuction,

    #[error("no standing bid to settle")]
    NoStandingBid,

    #[error("early settlement is disabled by league configuration")]
    FinalizeNotAllowed,

    #[error("no completed auction to undo")]
    NothingToUndo,

    #[error("unknown player id {0}")]
    UnknownPlayer(PlayerId),

    #[error("unknown team id {0}")]
    UnknownTeam(TeamId),
}

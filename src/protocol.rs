// Message types exchanged between the TUI and the app orchestrator.
//
// Commands flow TUI -> orchestrator over one mpsc channel; snapshots and
// notices flow back over another. The engine never sees these types.

use serde::{Deserialize, Serialize};

use crate::auction::engine::{AuctionView, TeamView};
use crate::auction::history::HistoryEntry;
use crate::auction::roster::{Player, ProfileUpdate};
use crate::auction::{PlayerId, TeamId};

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// What the logged-in user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRole {
    /// Runs the auction: start, pause, settle, undo, reset, profile edits.
    Operator,
    /// Bids for one team.
    Leader(TeamId),
    /// Read-only spectator.
    Observer,
}

/// The active login. Held by the orchestrator, not the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub role: SessionRole,
}

/// One entry on the login screen and the role it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUser {
    pub name: String,
    pub role: SessionRole,
}

// ---------------------------------------------------------------------------
// Commands and updates
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Login {
        user: String,
        passcode: Option<String>,
    },
    Logout,
    StartAuction,
    TogglePause,
    Bid {
        amount: u32,
    },
    Finalize,
    Undo,
    ResetAll,
    EditProfile {
        player: PlayerId,
        update: ProfileUpdate,
    },
    Quit,
}

/// Updates pushed from the orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full view-state replacement.
    Snapshot(Box<AppSnapshot>),
    /// One-line status message (sale results, rejections, login feedback).
    Notice(String),
}

/// A complete view of the application state for rendering.
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    pub league_name: String,
    pub session: Option<Session>,
    pub login_users: Vec<LoginUser>,
    pub passcode_required: bool,
    pub auction: Option<AuctionView>,
    pub teams: Vec<TeamView>,
    pub unassigned: Vec<Player>,
    pub history: Vec<HistoryEntry>,
    pub history_depth: usize,
    /// Whether the operator's early-settle key is live.
    pub operator_finalize: bool,
}
